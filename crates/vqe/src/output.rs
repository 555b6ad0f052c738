use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quantum::Result;

use crate::history::ConvergenceHistory;
use crate::sweep::EnergyCurvePoint;

/// Writes `bond_length,energy` rows.
pub fn write_curve_csv(path: impl AsRef<Path>, points: &[EnergyCurvePoint]) -> Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    write_curve(&mut f, points)?;
    f.flush()?;
    Ok(())
}

/// Writes `iteration,energy` rows.
pub fn write_history_csv(path: impl AsRef<Path>, history: &ConvergenceHistory) -> Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    write_history(&mut f, history)?;
    f.flush()?;
    Ok(())
}

pub fn write_curve<W: Write>(out: &mut W, points: &[EnergyCurvePoint]) -> Result<()> {
    writeln!(out, "bond_length,energy")?;
    for p in points {
        writeln!(out, "{},{}", p.bond_length, p.energy)?;
    }
    Ok(())
}

pub fn write_history<W: Write>(out: &mut W, history: &ConvergenceHistory) -> Result<()> {
    writeln!(out, "iteration,energy")?;
    for (iteration, energy) in history.energies() {
        writeln!(out, "{},{}", iteration, energy)?;
    }
    Ok(())
}
