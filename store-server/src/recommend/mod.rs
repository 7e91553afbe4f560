//! 推荐引擎
//!
//! 基于离线挖掘的关联规则回答 "买了 X 的人也买了…"。
//! 排序、去重、补齐三段流水线见 [`engine`]。

mod engine;

pub use engine::{SUGGESTION_LIMIT, SuggestionEngine};
