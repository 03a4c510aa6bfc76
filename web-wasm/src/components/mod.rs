//! UIコンポーネント

pub mod artwork_grid;
pub mod observation_form;
pub mod overlays;
pub mod refine_step;
pub mod selection_card;
pub mod stepper;
pub mod summary_step;
