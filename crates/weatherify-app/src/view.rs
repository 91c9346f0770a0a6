//! Text rendering of the main screen.

use std::fmt;

use weatherify_auth::SessionState;
use weatherify_core::Notification;
use weatherify_weather::Mood;

use crate::state::AppState;

pub const LOADING_TEXT: &str = "Loading...";
pub const SUBTITLE: &str = "Generate a playlist based on weather";

/// Buttons offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Generate,
    Logout,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Generate => "Generate",
            Self::Logout => "Logout",
        }
    }

    /// Command typed at the prompt to trigger this action
    pub fn command(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Generate => "generate",
            Self::Logout => "logout",
        }
    }
}

/// What the screen shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Main {
        subtitle: String,
        /// One indicator per playable mood; `true` for the current one
        moods: [(Mood, bool); 3],
        actions: Vec<Action>,
        notification: Option<String>,
    },
}

impl Screen {
    pub fn build(state: &AppState, notification: Option<&Notification>) -> Self {
        let actions = match state.session {
            SessionState::Loading => return Self::Loading,
            SessionState::Authenticated => vec![Action::Generate, Action::Logout],
            SessionState::Unauthenticated => vec![Action::Login],
        };

        let subtitle = match &state.weather.location_name {
            Some(city) => format!("{} in {}", SUBTITLE, city),
            None => SUBTITLE.to_string(),
        };

        Self::Main {
            subtitle,
            moods: Mood::PLAYABLE.map(|m| (m, m == state.weather.mood)),
            actions,
            notification: notification.map(|n| n.message.clone()),
        }
    }

    pub fn offers(&self, action: Action) -> bool {
        match self {
            Self::Loading => false,
            Self::Main { actions, .. } => actions.contains(&action),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (subtitle, moods, actions, notification) = match self {
            Self::Loading => return writeln!(f, "{}", LOADING_TEXT),
            Self::Main {
                subtitle,
                moods,
                actions,
                notification,
            } => (subtitle, moods, actions, notification),
        };

        writeln!(f, "Weatherify")?;
        writeln!(f, "{}", subtitle)?;

        let indicators: Vec<String> = moods
            .iter()
            .map(|(mood, on)| format!("[{}] {}", if *on { "x" } else { " " }, mood.description()))
            .collect();
        writeln!(f, "{}", indicators.join("  "))?;

        let buttons: Vec<String> = actions
            .iter()
            .map(|a| format!("{} ({})", a.label(), a.command()))
            .collect();
        writeln!(f, "{}", buttons.join("  "))?;

        if let Some(message) = notification {
            writeln!(f, "> {}", message)?;
        }
        Ok(())
    }
}
