use crate::services::slug::slugify;
use std::io::Write;

pub fn run<W: Write>(texts: &[String], out: &mut W) -> std::io::Result<()> {
    for text in texts {
        writeln!(out, "{}", slugify(text))?;
    }
    Ok(())
}
