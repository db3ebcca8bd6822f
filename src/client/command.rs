//! Commands understood by the remote-control port.

/// The response prefix to a successful `echo` command.
pub const ECHO_RESPONSE: &str = "echo";

/// The response prefix to a successful navigation or load command.
pub const OK_RESPONSE: &str = "OK";

/// A command sent to the remote-control port.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// A liveness probe (`echo`).
    Echo,

    /// Moves the viewport to a locus (`goto <locus>`).
    Goto(String),

    /// Loads a file by path (`load <path>`).
    Load(String),
}

impl Command {
    /// Gets the prefix a response must start with for the command to be
    /// considered successful.
    ///
    /// # Examples
    ///
    /// ```
    /// use igvcontrol::client::Command;
    ///
    /// assert_eq!(Command::Echo.expected_response(), "echo");
    /// assert_eq!(Command::Goto(String::from("chr1:1")).expected_response(), "OK");
    /// ```
    pub fn expected_response(&self) -> &'static str {
        match self {
            Command::Echo => ECHO_RESPONSE,
            Command::Goto(_) | Command::Load(_) => OK_RESPONSE,
        }
    }

    /// Returns whether `response` reports success for this command.
    pub fn is_success(&self, response: &str) -> bool {
        response.starts_with(self.expected_response())
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Echo => write!(f, "echo"),
            Command::Goto(locus) => write!(f, "goto {locus}"),
            Command::Load(path) => write!(f, "load {path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        assert_eq!(Command::Echo.to_string(), "echo");
        assert_eq!(
            Command::Goto(String::from("chr1:123456")).to_string(),
            "goto chr1:123456"
        );
        assert_eq!(
            Command::Load(String::from("path/to/file.bam")).to_string(),
            "load path/to/file.bam"
        );
    }

    #[test]
    fn test_is_success() {
        assert!(Command::Echo.is_success("echo"));
        assert!(Command::Echo.is_success("echo\n"));
        assert!(!Command::Echo.is_success("OK"));
        assert!(!Command::Echo.is_success(""));

        let goto = Command::Goto(String::from("chr1:1"));
        assert!(goto.is_success("OK"));
        assert!(goto.is_success("OK\r\n"));
        assert!(!goto.is_success("ERROR"));
        assert!(!goto.is_success("ok"));
        assert!(!goto.is_success(" OK"));
    }
}
