//! Generation style presets: each pairs a look instruction (step 1) with a
//! scene instruction (step 2).

use crate::{Error, Result};

pub const REALISTIC_LOOK: &str = include_str!("../data/prompts/realistic_look.txt");
pub const REALISTIC_SCENE: &str = include_str!("../data/prompts/realistic_scene.txt");
pub const FASHION_WEEK_LOOK: &str = include_str!("../data/prompts/fashion_week_look.txt");
pub const FASHION_WEEK_SCENE: &str = include_str!("../data/prompts/fashion_week_scene.txt");
pub const EDITORIAL_LOOK: &str = include_str!("../data/prompts/editorial_look.txt");
pub const EDITORIAL_SCENE: &str = include_str!("../data/prompts/editorial_scene.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptStyle {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub look_instruction: &'static str,
    pub scene_instruction: &'static str,
}

pub const DEFAULT_STYLE_ID: &str = "realistic";

const STYLES: [PromptStyle; 3] = [
    PromptStyle {
        id: "realistic",
        name: "Realistic",
        description: "E-commerce focus, faithful to reality.",
        look_instruction: REALISTIC_LOOK,
        scene_instruction: REALISTIC_SCENE,
    },
    PromptStyle {
        id: "fashion-week",
        name: "Fashion Week",
        description: "Runway look with dramatic lighting and poses.",
        look_instruction: FASHION_WEEK_LOOK,
        scene_instruction: FASHION_WEEK_SCENE,
    },
    PromptStyle {
        id: "editorial",
        name: "Editorial",
        description: "Magazine style, artistic and conceptual composition.",
        look_instruction: EDITORIAL_LOOK,
        scene_instruction: EDITORIAL_SCENE,
    },
];

pub fn styles() -> &'static [PromptStyle] {
    &STYLES
}

pub fn find_style(id: &str) -> Result<&'static PromptStyle> {
    STYLES.iter().find(|style| style.id == id).ok_or_else(|| {
        let known: Vec<&str> = STYLES.iter().map(|style| style.id).collect();
        Error::InvalidInput(format!(
            "Unknown style '{}'. Available styles: {}",
            id,
            known.join(", ")
        ))
    })
}
