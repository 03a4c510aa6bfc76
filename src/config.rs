use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub bind: String,
    pub public_dir: PathBuf,
    /// 上流呼び出しのタイムアウト（0 = 指定なし）
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            bind: DEFAULT_BIND.into(),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            timeout_seconds: 0,
        }
    }
}

impl Config {
    /// 設定ファイル + 環境変数
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 指定パスから読み込み（なければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Configuration("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("art-observe").join("config.json"))
    }

    /// 環境変数で上書き
    ///
    /// GEMINI_API_KEY は設定ファイルより優先。PORT はバインド先のポートだけを差し替える。
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.model = model;
        }
        if let Some(base) = lookup("GEMINI_API_BASE_URL") {
            self.api_base_url = base;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            let host = self
                .bind
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".into());
            self.bind = format!("{}:{}", host, port);
        }
    }

    /// 空文字のキーは未設定とみなす
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
