//! Interactive command parsing.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Suggest(String),
    /// 1-based index into the last suggestion list
    Pick(usize),
    Locate,
    Theme,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search <city>    show the weather for a city
  suggest <text>   list matching places
  pick <n>         show the weather for suggestion n
  locate           show the weather for this device's location
  theme            switch between light and dark
  help             show this help
  quit             exit
A line without a command is treated as a search.
";

impl Command {
    /// `None` for blank input. Unknown words are treated as a city search.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Self::Search(rest.to_string()),
            "suggest" => Self::Suggest(rest.to_string()),
            "pick" | "p" => {
                let n: usize = rest
                    .parse()
                    .map_err(|_| format!("pick needs a suggestion number, got {:?}", rest))?;
                if n == 0 {
                    return Err("suggestions are numbered from 1".to_string());
                }
                Self::Pick(n)
            }
            "locate" | "l" => Self::Locate,
            "theme" | "t" => Self::Theme,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Search(line.to_string()),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("search New York").unwrap(),
            Some(Command::Search("New York".into()))
        );
        assert_eq!(
            Command::parse("  suggest  Lon ").unwrap(),
            Some(Command::Suggest("Lon".into()))
        );
        assert_eq!(Command::parse("pick 2").unwrap(), Some(Command::Pick(2)));
        assert_eq!(Command::parse("LOCATE").unwrap(), Some(Command::Locate));
        assert_eq!(Command::parse("q").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn bare_text_is_a_search() {
        assert_eq!(
            Command::parse("Buenos Aires").unwrap(),
            Some(Command::Search("Buenos Aires".into()))
        );
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn pick_needs_a_positive_number() {
        assert!(Command::parse("pick").is_err());
        assert!(Command::parse("pick two").is_err());
        assert!(Command::parse("pick 0").is_err());
    }
}
