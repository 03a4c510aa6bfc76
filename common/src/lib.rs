//! Art Observe Common Library
//!
//! サーバー(CLI)とWeb(WASM)で共有される型・プロンプト・ウィザード状態機械

pub mod types;
pub mod catalog;
pub mod error;
pub mod normalizer;
pub mod prompts;
pub mod fallback;
pub mod session;
pub mod wizard;
pub mod api;

pub use types::{Artwork, ArtworkSource, Observation, ObservationField, PreAnalysis, Preset};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use normalizer::{clean_prompt_text, normalize_hints};
pub use prompts::{
    build_hint_prompt, build_image_prompt_instruction, build_prompt_preview,
    fallback_image_prompt, refine_user_prompt_text, ArtworkMeta,
};
pub use fallback::{build_hints_from_pre_analysis, build_local_hints, surface_fallback_hints};
pub use session::{KeyValueStore, MemoryStore, Session};
pub use wizard::{Action, Effect, Event, Step, Transition, Wizard, WizardError};
pub use api::{ErrorResponse, HintRequest, HintsResponse, PromptRequest, PromptResponse};
