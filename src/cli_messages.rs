//! CLI command messaging system
//!
//! Consistent console output for the one-shot commands (`snapshot`, `config`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warn,
    Error,
    Success,
}

impl MessageKind {
    fn tag(self) -> &'static str {
        match self {
            MessageKind::Info => "\x1b[1;33m[INFO]\x1b[0m",
            MessageKind::Warn => "\x1b[1;91m[WARN]\x1b[0m",
            MessageKind::Error => "\x1b[1;31m[ERROR]\x1b[0m",
            MessageKind::Success => "\x1b[1;32m[SUCCESS]\x1b[0m",
        }
    }
}

/// `[TAG] title`, with the details tab-separated on the same line when present.
pub fn format_message(kind: MessageKind, title: &str, details: &str) -> String {
    if details.is_empty() {
        format!("{} {}", kind.tag(), title)
    } else {
        format!("{} {}\t {}", kind.tag(), title, details)
    }
}

/// Errors go to stderr, everything else to stdout.
pub fn print_message(kind: MessageKind, title: &str, details: &str) {
    let line = format_message(kind, title, details);
    if kind == MessageKind::Error {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_message(
            $crate::cli_messages::MessageKind::Info,
            $title,
            &format!($($details)*),
        )
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_message(
            $crate::cli_messages::MessageKind::Warn,
            $title,
            &format!($($details)*),
        )
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_message($crate::cli_messages::MessageKind::Error, $title, "")
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_message($crate::cli_messages::MessageKind::Error, $title, $details)
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_message(
            $crate::cli_messages::MessageKind::Success,
            $title,
            &format!($($details)*),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_follow_the_title_on_one_line() {
        assert_eq!(
            format_message(MessageKind::Info, "Backend", "http://localhost:5000/api"),
            "\x1b[1;33m[INFO]\x1b[0m Backend\t http://localhost:5000/api"
        );
        assert_eq!(
            format_message(MessageKind::Success, "Config cleared", ""),
            "\x1b[1;32m[SUCCESS]\x1b[0m Config cleared"
        );
    }
}
