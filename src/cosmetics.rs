//! Equipped cosmetics
//!
//! Pure presentation: skins tint the paddle/ball/trail and rarity scales
//! the pickup sparkle burst. Nothing here may influence physics or
//! scoring.

use serde::{Deserialize, Serialize};

/// Simple sRGB color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Which visual slot an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CosmeticSlot {
    PaddleSkin,
    BallSkin,
    BrickSkin,
    Trail,
    Background,
    Aura,
    Explosion,
}

/// Item rarity; drives the sparkle count on pickup bursts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Extra sparkle particles layered onto pickup bursts
    pub fn sparkle_count(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 4,
            Rarity::Epic => 8,
            Rarity::Legendary => 16,
        }
    }
}

/// One equipped item as stored by the host profile. The color is a raw
/// string so stale or hand-edited profiles never break loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquippedItem {
    pub slot: CosmeticSlot,
    pub color: String,
    pub rarity: Rarity,
}

/// Neutral defaults used when a slot is empty or its color fails to parse
const DEFAULT_PADDLE: Color = Color::rgb(0xe0, 0xe0, 0xe0);
const DEFAULT_BALL: Color = Color::rgb(0xff, 0xff, 0xff);
const DEFAULT_TRAIL: Color = Color::rgb(0x80, 0xc0, 0xff);
const DEFAULT_BACKGROUND: Color = Color::rgb(0x10, 0x10, 0x18);

/// Resolved cosmetic state handed to the renderer each frame
#[derive(Debug, Clone, PartialEq)]
pub struct EquippedCosmetics {
    pub paddle_color: Color,
    pub ball_color: Color,
    pub trail_color: Color,
    pub background_color: Color,
    /// Tint layered over the per-kind brick palette, when equipped
    pub brick_tint: Option<Color>,
    /// Explosion particle color override, when equipped
    pub explosion_color: Option<Color>,
    pub aura_rarity: Rarity,
}

impl Default for EquippedCosmetics {
    fn default() -> Self {
        Self {
            paddle_color: DEFAULT_PADDLE,
            ball_color: DEFAULT_BALL,
            trail_color: DEFAULT_TRAIL,
            background_color: DEFAULT_BACKGROUND,
            brick_tint: None,
            explosion_color: None,
            aura_rarity: Rarity::Common,
        }
    }
}

impl EquippedCosmetics {
    /// Resolve a profile's equipped items. Unknown colors fall back to the
    /// slot's neutral default; later items win when a slot repeats.
    pub fn resolve(items: &[EquippedItem]) -> Self {
        let mut resolved = Self::default();
        for item in items {
            // Aura carries no color; don't warn about its empty field
            let color = if item.slot == CosmeticSlot::Aura {
                None
            } else {
                let parsed = Color::parse_hex(&item.color);
                if parsed.is_none() {
                    log::warn!(
                        "unparseable cosmetic color {:?} for {:?}, using default",
                        item.color,
                        item.slot
                    );
                }
                parsed
            };
            match item.slot {
                CosmeticSlot::PaddleSkin => {
                    resolved.paddle_color = color.unwrap_or(DEFAULT_PADDLE);
                }
                CosmeticSlot::BallSkin => {
                    resolved.ball_color = color.unwrap_or(DEFAULT_BALL);
                }
                CosmeticSlot::Trail => {
                    resolved.trail_color = color.unwrap_or(DEFAULT_TRAIL);
                }
                CosmeticSlot::Background => {
                    resolved.background_color = color.unwrap_or(DEFAULT_BACKGROUND);
                }
                // These two fall back to the renderer's own palette
                CosmeticSlot::BrickSkin => resolved.brick_tint = color,
                CosmeticSlot::Explosion => resolved.explosion_color = color,
                CosmeticSlot::Aura => {
                    resolved.aura_rarity = item.rarity;
                }
            }
        }
        resolved
    }

    /// Sparkle bonus for pickup bursts
    pub fn sparkle_bonus(&self) -> usize {
        self.aura_rarity.sparkle_count()
    }
}
