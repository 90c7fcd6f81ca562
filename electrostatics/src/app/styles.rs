use owo_colors::Style;

// Stylesheet used to colorize prints.
#[derive(Debug, Default)]
pub(crate) struct Styles {
    pub name_style: Style,
    pub path_style: Style,
    pub time_style: Style,
}

impl Styles {
    pub(crate) fn colorize(&mut self) {
        self.name_style = Style::new().bright_blue();
        self.path_style = Style::new().bright_green();
        self.time_style = Style::new().bright_yellow();
    }
}
