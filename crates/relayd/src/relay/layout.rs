//! Minimal `${token}` layouts for turning a [`LogEvent`] into chat text.
//!
//! Supported tokens: `${level}`, `${logger}`, `${message}`, `${time}`.
//! Every token accepts `:uppercase=true`. Anything outside `${...}` is copied
//! verbatim.

use std::str::FromStr;

use thiserror::Error;

use super::event::LogEvent;

/// Layout used when none is configured. Chat clients show their own
/// timestamps, so the date is left out.
pub const DEFAULT_LAYOUT: &str = "${level:uppercase=true}|${logger}|${message}";

/// Renders a log event into text.
pub trait Render: Send + Sync {
    fn render(&self, event: &LogEvent) -> String;
}

/// Errors from parsing a layout template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unterminated token starting at \"${{{0}\"")]
    Unterminated(String),

    #[error("unknown token \"{0}\"")]
    UnknownToken(String),

    #[error("unknown option \"{0}\"")]
    UnknownOption(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Level,
    Logger,
    Message,
    Time,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { field: Field, uppercase: bool },
}

impl Segment {
    fn parse_token(token: &str) -> Result<Self, LayoutError> {
        let mut parts = token.split(':');
        let name = parts.next().unwrap_or_default().trim();

        let field = match name {
            "level" => Field::Level,
            "logger" => Field::Logger,
            "message" => Field::Message,
            "time" => Field::Time,
            _ => return Err(LayoutError::UnknownToken(name.to_string())),
        };

        let mut uppercase = false;
        for option in parts {
            match option.trim().split_once('=') {
                Some(("uppercase", "true")) => uppercase = true,
                Some(("uppercase", "false")) => uppercase = false,
                _ => return Err(LayoutError::UnknownOption(option.to_string())),
            }
        }

        Ok(Self::Field { field, uppercase })
    }
}

/// Parsed layout template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    segments: Vec<Segment>,
}

impl Layout {
    /// True when the layout can only ever render an empty string.
    pub fn is_blank(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Default for Layout {
    fn default() -> Self {
        // The default template is a known-good constant.
        DEFAULT_LAYOUT.parse().unwrap_or(Self {
            segments: Vec::new(),
        })
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(template: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some((literal, after)) = rest.split_once("${") {
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_string()));
            }
            let (token, tail) = after
                .split_once('}')
                .ok_or_else(|| LayoutError::Unterminated(after.to_string()))?;
            segments.push(Segment::parse_token(token)?);
            rest = tail;
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }
}

impl Render for Layout {
    fn render(&self, event: &LogEvent) -> String {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, uppercase } => {
                    let value = match field {
                        Field::Level => level_name(event),
                        Field::Logger => event.logger.clone(),
                        Field::Message => event.message.clone(),
                        Field::Time => event.timestamp.format("%H:%M:%S%.3f").to_string(),
                    };
                    if *uppercase {
                        out.push_str(&value.to_uppercase());
                    } else {
                        out.push_str(&value);
                    }
                }
            }
        }

        out
    }
}

/// "Info", "Warn", ... (title case of the tracing level).
fn level_name(event: &LogEvent) -> String {
    let upper = event.level.as_str();
    let mut chars = upper.chars();
    match chars.next() {
        Some(first) => format!("{first}{}", chars.as_str().to_lowercase()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn event() -> LogEvent {
        LogEvent::new(Level::WARN, "app::worker", "disk almost full")
    }

    #[test]
    fn test_default_layout() {
        let layout = Layout::default();
        assert_eq!(layout.render(&event()), "WARN|app::worker|disk almost full");
    }

    #[test]
    fn test_level_title_case() {
        let layout: Layout = "${level}".parse().unwrap();
        assert_eq!(layout.render(&event()), "Warn");
    }

    #[test]
    fn test_literals_around_tokens() {
        let layout: Layout = "[${logger}] ${message}!".parse().unwrap();
        assert_eq!(layout.render(&event()), "[app::worker] disk almost full!");
    }

    #[test]
    fn test_plain_text_layout() {
        let layout: Layout = "bot-main".parse().unwrap();
        assert_eq!(layout.render(&event()), "bot-main");
    }

    #[test]
    fn test_empty_layout_is_blank() {
        let layout: Layout = "".parse().unwrap();
        assert!(layout.is_blank());
        assert_eq!(layout.render(&event()), "");
    }

    #[test]
    fn test_empty_message_renders_empty() {
        let layout: Layout = "${message}".parse().unwrap();
        let event = LogEvent::new(Level::INFO, "app", "");
        assert_eq!(layout.render(&event), "");
    }

    #[test]
    fn test_time_token() {
        let layout: Layout = "${time}".parse().unwrap();
        let rendered = layout.render(&event());
        // HH:MM:SS.mmm
        assert_eq!(rendered.len(), 12);
        assert_eq!(rendered.matches(':').count(), 2);
    }

    #[test]
    fn test_unterminated_token() {
        let result = "${level".parse::<Layout>();
        assert!(matches!(result, Err(LayoutError::Unterminated(_))));
    }

    #[test]
    fn test_unknown_token() {
        let result = "${callsite}".parse::<Layout>();
        assert_eq!(result, Err(LayoutError::UnknownToken("callsite".to_string())));
    }

    #[test]
    fn test_unknown_option() {
        let result = "${level:padding=5}".parse::<Layout>();
        assert_eq!(
            result,
            Err(LayoutError::UnknownOption("padding=5".to_string()))
        );
    }
}
