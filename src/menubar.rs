use std::io::Write;

use crossterm::{queue, style};

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        if let Some(open) = rest.find('[') {
            if open > 0 {
                print_dim(out, &rest[..open])?;
            }
            rest = &rest[open..];
            if let Some(close) = rest.find(']') {
                print_bold(out, &rest[..=close])?;
                rest = &rest[close + 1..];
            } else {
                queue!(out, style::Print(rest))?;
                break;
            }
        } else {
            print_dim(out, rest)?;
            break;
        }
    }
    Ok(())
}

/// Print the window title in bold.
pub fn print_title(out: &mut impl Write, title: &str) -> anyhow::Result<()> {
    print_bold(out, title)
}

fn print_dim(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    queue!(
        out,
        style::SetAttribute(style::Attribute::Dim),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

fn print_bold(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    queue!(
        out,
        style::SetAttribute(style::Attribute::Bold),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}
