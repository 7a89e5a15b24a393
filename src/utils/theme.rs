use colored::Colorize;

pub struct Theme {
    pub prompt_style: Box<dyn Fn(&str) -> String>,
    pub error_style: Box<dyn Fn(&str) -> String>,
    pub warning_style: Box<dyn Fn(&str) -> String>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            prompt_style: Box::new(|s: &str| s.bright_cyan().to_string()),
            error_style: Box::new(|s: &str| s.bright_red().to_string()),
            warning_style: Box::new(|s: &str| s.yellow().to_string()),
        }
    }
}

impl Theme {
    pub fn plain() -> Self {
        Theme {
            prompt_style: Box::new(|s: &str| s.to_string()),
            error_style: Box::new(|s: &str| s.to_string()),
            warning_style: Box::new(|s: &str| s.to_string()),
        }
    }

    pub fn load_theme(theme_name: &str) -> Self {
        match theme_name {
            "plain" => Theme::plain(),
            "dark" => Theme {
                prompt_style: Box::new(|s: &str| s.bright_purple().to_string()),
                error_style: Box::new(|s: &str| s.red().to_string()),
                warning_style: Box::new(|s: &str| s.bright_yellow().to_string()),
            },
            _ => Theme::default(),
        }
    }
}
