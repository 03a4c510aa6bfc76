//! Art Observe
//!
//! 명화 관찰 학습 도구のサーバー側:
//! Gemini を使ったAIヒント・画像プロンプトAPIと静的ファイル配信。

pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod server;
pub mod service;
