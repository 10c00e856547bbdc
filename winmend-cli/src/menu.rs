//! Interactive mode selection.

use std::io::{BufRead, Write};
use winmend_types::RepairMode;

const MENU: &str = "\
winmend - Windows component store repair

  1) Repair using current component store
  2) Repair using local install media
  Q) Quit
";

/// Map a menu answer to a mode. Anything but `1` or `2` means quit.
pub fn parse_choice(input: &str) -> Option<RepairMode> {
    match input.trim() {
        "1" => Some(RepairMode::CurrentStore),
        "2" => Some(RepairMode::LocalMedia),
        _ => None,
    }
}

/// Show the menu on `output` and read one answer from `input`.
///
/// End of input counts as quit.
pub fn prompt_mode<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> anyhow::Result<Option<RepairMode>> {
    write!(output, "{}\nSelect an option: ", MENU)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_choice(&line))
}
