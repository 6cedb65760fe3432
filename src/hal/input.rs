use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Quit,
    Swap,
    Other,
}

impl From<char> for Command {
    fn from(key: char) -> Self {
        match key.to_ascii_lowercase() {
            'q' => Self::Quit,
            's' => Self::Swap,
            _ => Self::Other,
        }
    }
}

pub trait CommandSource {
    /// Waits at most `timeout` for a single command
    fn poll(&mut self, timeout: Duration) -> Option<Command>;
}

pub struct NoCommand;

impl CommandSource for NoCommand {
    fn poll(&mut self, _: Duration) -> Option<Command> {
        None
    }
}

mod test {
    #[test]
    fn test_command_from_key() {
        use super::Command;

        assert_eq!(Command::from('q'), Command::Quit);
        assert_eq!(Command::from('Q'), Command::Quit);
        assert_eq!(Command::from('s'), Command::Swap);
        assert_eq!(Command::from('x'), Command::Other);
    }
}
