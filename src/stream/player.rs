//! Local Player - mpv/VLC playback support
//!
//! Describes how to launch the external player for one stream URL.

use crate::stream::process::{is_on_path, Invocation, StdioMode};

/// Supported local players
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerType {
    /// mpv media player (default)
    #[default]
    Mpv,
    /// VLC media player
    Vlc,
    /// Any other program that takes a URL as its last argument
    Custom(String),
}

impl PlayerType {
    /// Get the command name for this player
    pub fn command(&self) -> &str {
        match self {
            PlayerType::Mpv => "mpv",
            PlayerType::Vlc => {
                // On macOS, VLC is an app bundle - check for it
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
            PlayerType::Custom(program) => program,
        }
    }

    /// Get a display name for this player
    pub fn display_name(&self) -> &str {
        match self {
            PlayerType::Mpv => "mpv",
            PlayerType::Vlc => "VLC",
            PlayerType::Custom(program) => program,
        }
    }

    /// Recognise well-known players by bare program name
    fn from_program(program: &str) -> Self {
        match program {
            "mpv" => PlayerType::Mpv,
            "vlc" => PlayerType::Vlc,
            _ => PlayerType::Custom(program.to_string()),
        }
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Local player for streaming audio formats
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalPlayer {
    player_type: PlayerType,
    extra_args: Vec<String>,
}

impl LocalPlayer {
    /// Create a new local player with the specified type
    pub fn new(player_type: PlayerType) -> Self {
        Self {
            player_type,
            extra_args: Vec::new(),
        }
    }

    /// Create an mpv player
    pub fn mpv() -> Self {
        Self::new(PlayerType::Mpv)
    }

    /// Split a whitespace-separated command line such as `mpv --no-video`
    ///
    /// Quotes are not interpreted, so an argument cannot contain spaces.
    /// Returns `None` for an empty command.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        Some(Self {
            player_type: PlayerType::from_program(program),
            extra_args: parts.map(str::to_string).collect(),
        })
    }

    /// Get the player type
    pub fn player_type(&self) -> &PlayerType {
        &self.player_type
    }

    /// Check if the player is available on the system
    pub fn is_available(&self) -> bool {
        is_on_path(self.player_type.command())
    }

    /// Build the command that plays `stream_url` in the foreground
    ///
    /// The player shares our terminal so seeking, pausing and volume
    /// keys keep working.
    pub fn invocation(&self, stream_url: &str) -> Invocation {
        let mut inv = Invocation::new(self.player_type.command())
            .args(self.extra_args.iter().cloned())
            .stdio(StdioMode::Inherit);

        if self.player_type == PlayerType::Vlc {
            // Return control once the stream ends
            inv = inv.arg("--play-and-exit");
        }

        inv.arg(stream_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_type_command() {
        // On macOS with VLC installed, returns full path; otherwise "vlc"
        let vlc_cmd = PlayerType::Vlc.command();
        assert!(vlc_cmd == "vlc" || vlc_cmd == "/Applications/VLC.app/Contents/MacOS/VLC");
        assert_eq!(PlayerType::Mpv.command(), "mpv");
    }

    #[test]
    fn test_player_type_display() {
        assert_eq!(PlayerType::Vlc.to_string(), "VLC");
        assert_eq!(PlayerType::Mpv.to_string(), "mpv");
        assert_eq!(PlayerType::Custom("ffplay".into()).to_string(), "ffplay");
    }

    #[test]
    fn test_default_player() {
        assert_eq!(PlayerType::default(), PlayerType::Mpv);
    }

    #[test]
    fn test_from_command_line() {
        let player = LocalPlayer::from_command_line("mpv --no-video").unwrap();
        assert_eq!(player.player_type(), &PlayerType::Mpv);
        let inv = player.invocation("http://stream");
        assert_eq!(inv.program, "mpv");
        assert_eq!(inv.args, vec!["--no-video", "http://stream"]);

        let custom = LocalPlayer::from_command_line("/opt/bin/ffplay -nodisp").unwrap();
        assert_eq!(
            custom.player_type(),
            &PlayerType::Custom("/opt/bin/ffplay".into())
        );

        assert!(LocalPlayer::from_command_line("   ").is_none());
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let player = LocalPlayer::from_command_line("mpv --title='a b'").unwrap();
        let inv = player.invocation("http://x");
        assert_eq!(inv.args, vec!["--title='a", "b'", "http://x"]);
    }

    #[test]
    fn test_url_is_last_argument() {
        let inv = LocalPlayer::from_command_line("mpv --volume=50")
            .unwrap()
            .invocation("http://x");
        assert_eq!(inv.args.last().map(String::as_str), Some("http://x"));
        assert_eq!(inv.stdio, StdioMode::Inherit);
    }
}
