use std::path::PathBuf;

pub const HELP: &str = "Commands: select <image path> | analyze | report | dismiss | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `None` when no path was given, like a file dialog closed without a choice.
    Select(Option<PathBuf>),
    Analyze,
    Report,
    Dismiss,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "select" | "open" => {
            let path = rest.trim_matches(|c: char| c == '"' || c == '\'');
            if path.is_empty() {
                Ok(Command::Select(None))
            } else {
                Ok(Command::Select(Some(PathBuf::from(path))))
            }
        }
        "analyze" | "submit" => Ok(Command::Analyze),
        "report" | "download" => Ok(Command::Report),
        "dismiss" | "clear" => Ok(Command::Dismiss),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("Unknown command {other:?}. {HELP}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_accepts_quoted_paths() {
        assert_eq!(
            parse_command("select \"/scans/my scan.png\""),
            Ok(Command::Select(Some(PathBuf::from("/scans/my scan.png"))))
        );
        assert_eq!(parse_command("select"), Ok(Command::Select(None)));
        assert_eq!(parse_command("  SELECT   "), Ok(Command::Select(None)));
    }

    #[test]
    fn simple_commands_parse() {
        assert_eq!(parse_command("analyze"), Ok(Command::Analyze));
        assert_eq!(parse_command("report"), Ok(Command::Report));
        assert_eq!(parse_command("dismiss"), Ok(Command::Dismiss));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn blank_and_unknown_lines_are_errors() {
        assert_eq!(parse_command("   "), Err(String::new()));
        assert!(parse_command("upload x").unwrap_err().contains("Unknown command"));
    }
}
