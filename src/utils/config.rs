use dotenv::dotenv;
use rustyline::EditMode;
use std::env;
use std::path::PathBuf;

pub struct Config {
    pub name: String,
    pub prompt: String,
    pub theme: String,
    pub config_dir: PathBuf,
    pub history_file: PathBuf,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
}

impl Config {
    fn get_config_dir(home: Option<String>) -> PathBuf {
        if let Some(home) = home {
            PathBuf::from(home).join(".config/shell208")
        } else {
            PathBuf::from("tmp")
        }
    }

    fn default(home: Option<String>) -> Self {
        let config_dir = Self::get_config_dir(home);
        Config {
            name: String::from("shell208"),
            prompt: String::from("shell208> "),
            theme: String::from("default"),
            history_file: config_dir.join(".shell208_history"),
            editor_mode: String::from("emacs"),
            logger_level: String::from("warn"),
            logger_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    pub fn new() -> Self {
        // 优先加载环境变量
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 按 key 查询配置项，便于测试时替换环境变量来源
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // 默认配置
        let mut config = Config::default(lookup("HOME"));

        if let Some(prompt) = lookup("SHELL208_PROMPT") {
            config.prompt = prompt;
        }

        if let Some(theme) = lookup("SHELL208_THEME") {
            config.theme = theme;
        }

        if let Some(editor) = lookup("SHELL208_EDITOR") {
            config.editor_mode = editor;
        }

        if let Some(history) = lookup("SHELL208_HISTORY") {
            config.history_file = PathBuf::from(history);
        }

        if let Some(level) = lookup("SHELL208_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Some(dir) = lookup("SHELL208_LOG_DIR") {
            config.logger_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "vi" => EditMode::Vi,
            _ => EditMode::Emacs,
        }
    }
}
