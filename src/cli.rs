use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "art-observe")]
#[command(about = "명화 관찰 학습 도구 - AI 힌트/프롬프트 서버", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Webアプリと API を配信
    Serve {
        /// バインドアドレス（例: 0.0.0.0:8000）
        #[arg(short, long)]
        bind: Option<String>,

        /// 静的ファイルのディレクトリ
        #[arg(long)]
        public_dir: Option<PathBuf>,

        /// Geminiモデル名
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 作品1件についてAIヒントを取得（失敗時はローカル代替）
    Hints {
        /// 作品カタログJSON
        #[arg(short, long, default_value = "public/data/artworks.json")]
        catalog: PathBuf,

        /// 事前分析JSON
        #[arg(short, long)]
        analyses: Option<PathBuf>,

        /// 作品ID
        #[arg(long, required = true)]
        id: String,

        /// 自由観察
        #[arg(short, long, default_value = "")]
        free: String,

        /// 相対画像パスの基準ディレクトリ
        #[arg(long, default_value = "public")]
        public_dir: PathBuf,
    },

    /// AIの生テキストを質問2つに整形（ファイル省略時は標準入力）
    Normalize {
        /// 入力テキストファイル
        input: Option<PathBuf>,

        /// 画像プロンプトとして整形
        #[arg(long)]
        prompt: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
