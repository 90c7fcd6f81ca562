use std::io::Write;

/// Field vectors are drawn at this fraction of their sampling spacing, so neighbours never touch
const ARROW_SCALING: f64 = 0.85;

/// A gnuplot script drawing saved potentials and fields
///
/// The script expects to be run from the directory the data files were written to. Every plot
/// is rendered to an encapsulated postscript file named after the data it draws.
pub struct PlotScript<W: Write> {
    writer: W,
}

impl<W: Write> PlotScript<W> {
    /// Start a script whose axes cover `x_min..x_max` and `y_min..y_max`
    ///
    /// Data files are written from their lowest cell, so the axis minima are also used to shift
    /// the matrix indices back onto grid coordinates.
    pub fn new(mut writer: W, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> std::io::Result<Self> {
        write!(
            writer,
            concat!(
                "#!/usr/bin/gnuplot -persist\n",
                "\n",
                "set style line 1 lt 1 lc rgb \"red\"\n",
                "set palette defined ( 0 '#FFFFD9', 1 '#EDF8B1', 2 '#C7E9B4', 3 '#7FCDBB',\\\n",
                "                      4 '#41B6C4', 5 '#1D91C0', 6 '#225EA8', 7 '#0C2C84' ) \n",
                "\n",
                "set size ratio -1\n",
                "set term postscript color\n",
                "set pm3d map\n",
                "set xlabel \"i\"\n",
                "set ylabel \"j\"\n",
                "set nokey\n",
                "\n",
                "xMin = {x_min}\n",
                "xMax = {x_max}\n",
                "yMin = {y_min}\n",
                "yMax = {y_max}\n",
                "set xrange [xMin : xMax];\n",
                "set yrange [yMin : yMax];\n",
                "\n",
            ),
            x_min = x_min,
            x_max = x_max,
            y_min = y_min,
            y_max = y_max,
        )?;
        Ok(Self { writer })
    }

    /// A colour map of the potential saved as `name`, rendered to `name.eps`
    pub fn plot(&mut self, name: &str) -> std::io::Result<()> {
        write!(
            self.writer,
            "set title \"{name}\"\nset output \"{name}.eps\"\nsplot \"{name}\" using ($1+xMin):($2+yMin):3 matrix\n\n"
        )
    }

    /// The potential saved as `name` overlaid with every `spacing`th vector of `namefield`,
    /// rendered to `namefield.eps`
    pub fn field_plot(&mut self, name: &str, spacing: usize) -> std::io::Result<()> {
        let scale = ARROW_SCALING * spacing as f64;
        write!(
            self.writer,
            concat!(
                "set title \"{name}\"\n",
                "set output \"{name}field.eps\"\n",
                "scale = {scale}\n",
                "splot \"{name}\" using ($1+xMin):($2+yMin):3 matrix, \\\n",
                "\"{name}field\" every {spacing}:{spacing} using ($1):($2):(0.0):($3*scale):($4*scale):(0.0) with vectors\n",
                "\n",
            ),
            name = name,
            scale = scale,
            spacing = spacing,
        )
    }

    /// Contour lines of the potential saved as `name`, rendered to `namecontour.eps`
    pub fn contour_plot(&mut self, name: &str) -> std::io::Result<()> {
        write!(
            self.writer,
            concat!(
                "set contour base\n",
                "set cntrparam levels auto\n",
                "unset clabel\n",
                "set output \"{name}contour.eps\"\n",
                "splot \"{name}\" using ($1+xMin):($2+yMin):3 matrix ls 1 lw 3\n",
                "\n",
            ),
            name = name,
        )
    }

    /// Flush the script and hand back the writer
    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod test {
    use super::PlotScript;

    fn script(f: impl FnOnce(&mut PlotScript<Vec<u8>>)) -> String {
        let mut script = PlotScript::new(Vec::new(), -50., 50., -25., 25.).unwrap();
        f(&mut script);
        String::from_utf8(script.finish().unwrap()).unwrap()
    }

    #[test]
    fn header_sets_the_axis_ranges() {
        let text = script(|_| {});
        assert!(text.starts_with("#!/usr/bin/gnuplot -persist\n"));
        assert!(text.contains("xMin = -50\nxMax = 50\nyMin = -25\nyMax = 25\n"));
        assert!(text.ends_with("set yrange [yMin : yMax];\n\n"));
        assert!(text.contains("set pm3d map\n"));
    }

    #[test]
    fn potential_plots_read_the_matrix_file() {
        let text = script(|s| s.plot("plates").unwrap());
        assert!(text.ends_with(
            "set title \"plates\"\nset output \"plates.eps\"\nsplot \"plates\" using ($1+xMin):($2+yMin):3 matrix\n\n"
        ));
    }

    #[test]
    fn field_plots_sample_every_spacing_cells() {
        let text = script(|s| s.field_plot("plates", 4).unwrap());
        assert!(text.contains("set output \"platesfield.eps\"\n"));
        assert!(text.contains("scale = 3.4\n"));
        assert!(text.contains(
            "\"platesfield\" every 4:4 using ($1):($2):(0.0):($3*scale):($4*scale):(0.0) with vectors\n"
        ));
    }

    #[test]
    fn contour_plots_draw_lines_on_the_base() {
        let text = script(|s| s.contour_plot("plates").unwrap());
        assert!(text.contains("set contour base\n"));
        assert!(text.contains("set output \"platescontour.eps\"\n"));
        assert!(text.contains("matrix ls 1 lw 3\n"));
    }
}
