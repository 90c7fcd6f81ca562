//! Plain text forms of solved potentials and fields, readable by gnuplot

use electrostatics_fdm::{ElectricField, PotentialField};
use electrostatics_grid::Grid;
use itertools::Itertools;
use nalgebra::RealField;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `grid` as a matrix: one row per `j` starting from `j_min`, one column per `i`
///
/// Row `r` and column `c` of the output hold the cell (`i_min + c`, `j_min + r`), which is the
/// layout gnuplot's `matrix` keyword expects.
pub fn write_matrix<T, W>(writer: &mut W, grid: &Grid<T>) -> std::io::Result<()>
where
    T: Copy + RealField,
    W: Write,
{
    let extent = grid.extent();
    let width = extent.width();
    for row in grid.as_slice().chunks(width) {
        writeln!(writer, "{}", row.iter().join(" "))?;
    }
    Ok(())
}

/// Write `grid` as `i j V` tuples, `j` varying fastest, with a blank line after every `i`
pub fn write_tuples<T, W>(writer: &mut W, grid: &Grid<T>) -> std::io::Result<()>
where
    T: Copy + RealField,
    W: Write,
{
    let extent = grid.extent();
    for i in extent.i_min()..=extent.i_max() {
        for j in extent.j_min()..=extent.j_max() {
            let value = grid
                .get(i, j)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
            writeln!(writer, "{i} {j} {value}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write `field` as `i j Ex Ey` tuples normalised by the largest field magnitude
///
/// A field which vanishes everywhere is written unscaled. Tuples are ordered as in
/// [`write_tuples`].
pub fn write_field<T, W>(writer: &mut W, field: &ElectricField<T>) -> std::io::Result<()>
where
    T: Copy + RealField,
    W: Write,
{
    let maximum = field.maximum_magnitude();
    let scale = if maximum > T::zero() {
        T::one() / maximum
    } else {
        T::one()
    };
    let extent = field.extent();
    for i in extent.i_min()..=extent.i_max() {
        for j in extent.j_min()..=extent.j_max() {
            let (x, y) = field
                .get(i, j)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
            writeln!(writer, "{} {} {} {}", i, j, x * scale, y * scale)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write `potential` to a new file at `path` with [`write_matrix`]
pub fn save_matrix<T: Copy + RealField>(
    path: &Path,
    potential: &PotentialField<T>,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix(&mut writer, potential.grid())?;
    writer.flush()
}

/// Write `potential` to a new file at `path` with [`write_tuples`]
pub fn save_tuples<T: Copy + RealField>(
    path: &Path,
    potential: &PotentialField<T>,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_tuples(&mut writer, potential.grid())?;
    writer.flush()
}

/// Write `field` to a new file at `path` with [`write_field`]
pub fn save_field<T: Copy + RealField>(
    path: &Path,
    field: &ElectricField<T>,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_field(&mut writer, field)?;
    writer.flush()
}
