//! Main menu and alerts

/// What a menu button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Instructions,
    HighScores,
    /// Resume a suspended run
    Continue,
}

impl MenuAction {
    /// DOM id of the button
    pub fn element_id(&self) -> &'static str {
        match self {
            MenuAction::Play => "play-btn",
            MenuAction::Instructions => "instructions-btn",
            MenuAction::HighScores => "highscores-btn",
            MenuAction::Continue => "continue-btn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: &'static str,
    pub action: MenuAction,
}

/// Title screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainMenu {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub buttons: Vec<MenuButton>,
}

impl MainMenu {
    /// Menu for this launch; `has_save` adds a continue button on top
    pub fn new(has_save: bool) -> Self {
        let mut buttons = Vec::with_capacity(4);
        if has_save {
            buttons.push(MenuButton {
                label: "continue",
                action: MenuAction::Continue,
            });
        }
        buttons.extend([
            MenuButton {
                label: "play",
                action: MenuAction::Play,
            },
            MenuButton {
                label: "instructions",
                action: MenuAction::Instructions,
            },
            MenuButton {
                label: "high scores",
                action: MenuAction::HighScores,
            },
        ]);
        Self {
            title: "slyme",
            subtitle: "eat or be ate, snake or be snaked.",
            buttons,
        }
    }
}

/// A modal message with a single OK button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// How-to-play alert
pub fn instructions() -> Alert {
    Alert {
        title: "how to play".to_string(),
        message: [
            "1. swipe to control the direction",
            "2. crush the apple",
            "3. don't snake yourself twin",
            "4. try to get the highest score",
        ]
        .join("\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_buttons() {
        let menu = MainMenu::new(false);
        assert_eq!(menu.title, "slyme");
        let labels: Vec<_> = menu.buttons.iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["play", "instructions", "high scores"]);

        let menu = MainMenu::new(true);
        assert_eq!(menu.buttons[0].action, MenuAction::Continue);
    }

    #[test]
    fn test_element_ids_unique() {
        let ids: Vec<_> = MainMenu::new(true)
            .buttons
            .iter()
            .map(|b| b.action.element_id())
            .collect();
        for (i, id) in ids.iter().enumerate() {
            assert!(!ids[i + 1..].contains(id));
        }
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_instructions_has_four_steps() {
        let alert = instructions();
        assert_eq!(alert.title, "how to play");
        assert_eq!(alert.message.matches("\n\n").count(), 3);
        assert!(alert.message.starts_with("1. swipe"));
    }
}
