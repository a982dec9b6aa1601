//! Theme selection and the color palettes used by ingest and export.
//!
//! The user preference is a closed enum including a `system` sentinel that
//! defers to the environment. A CLI has no `prefers-color-scheme`, so the
//! caller supplies the dark/light probe when resolving; everything past
//! resolution works with a concrete [`EffectiveTheme`].
//!
//! Palettes carry two kinds of color:
//! - the export palette (page background, content block, border, per-tier
//!   label colors), and
//! - the ingest flatten color: the opaque background transparent images are
//!   composited onto before the lossy re-encode.

use crate::store::Tier;
use image::Rgba;
use serde::{Deserialize, Serialize};

/// The persisted theme preference. Serialized as the kebab-case strings the
/// store file holds (`"system"`, `"retro-arcade"`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePref {
    #[default]
    System,
    Light,
    Dark,
    Cyberpunk,
    RetroArcade,
    Twitch,
    Pastel,
    Tangerine,
    ComfortZone,
    Colorblind,
}

impl ThemePref {
    /// Resolve the preference to a concrete theme. `prefers_dark` is the
    /// environment probe consulted only for `System`.
    pub fn resolve(self, prefers_dark: bool) -> EffectiveTheme {
        match self {
            ThemePref::System => {
                if prefers_dark {
                    EffectiveTheme::Dark
                } else {
                    EffectiveTheme::Light
                }
            }
            ThemePref::Light => EffectiveTheme::Light,
            ThemePref::Dark => EffectiveTheme::Dark,
            ThemePref::Cyberpunk => EffectiveTheme::Cyberpunk,
            ThemePref::RetroArcade => EffectiveTheme::RetroArcade,
            ThemePref::Twitch => EffectiveTheme::Twitch,
            ThemePref::Pastel => EffectiveTheme::Pastel,
            ThemePref::Tangerine => EffectiveTheme::Tangerine,
            ThemePref::ComfortZone => EffectiveTheme::ComfortZone,
            ThemePref::Colorblind => EffectiveTheme::Colorblind,
        }
    }
}

/// A concrete theme (the `system` sentinel already resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveTheme {
    Light,
    Dark,
    Cyberpunk,
    RetroArcade,
    Twitch,
    Pastel,
    Tangerine,
    ComfortZone,
    Colorblind,
}

/// Opaque RGB color from a `0xRRGGBB` literal.
const fn rgb(hex: u32) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 0xff])
}

/// Export colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page background behind everything.
    pub bg: Rgba<u8>,
    /// Fill of each tier's content block.
    pub content_bg: Rgba<u8>,
    /// Border stroke around content blocks.
    pub border: Rgba<u8>,
    /// Label block colors, indexed in tier order S..D.
    tier: [Rgba<u8>; 5],
}

impl Palette {
    /// The label block color for a tier.
    pub fn tier_color(&self, tier: Tier) -> Rgba<u8> {
        self.tier[tier as usize]
    }
}

impl EffectiveTheme {
    /// The export palette for this theme.
    pub fn palette(self) -> Palette {
        match self {
            EffectiveTheme::Light => Palette {
                bg: rgb(0xf8fafc),
                content_bg: rgb(0xffffff),
                border: rgb(0xe2e8f0),
                tier: [
                    rgb(0xdc2626),
                    rgb(0xea580c),
                    rgb(0xca8a04),
                    rgb(0x16a34a),
                    rgb(0x2563eb),
                ],
            },
            EffectiveTheme::Dark => Palette {
                bg: rgb(0x0f172a),
                content_bg: rgb(0x1e293b),
                border: rgb(0x334155),
                tier: [
                    rgb(0xdc2626),
                    rgb(0xea580c),
                    rgb(0xca8a04),
                    rgb(0x16a34a),
                    rgb(0x2563eb),
                ],
            },
            EffectiveTheme::Cyberpunk => Palette {
                bg: rgb(0x0a0a0f),
                content_bg: rgb(0x12121a),
                border: rgb(0x2a2a3a),
                tier: [
                    rgb(0xff0066),
                    rgb(0xff7700),
                    rgb(0xffdd00),
                    rgb(0x00ff77),
                    rgb(0x00aaff),
                ],
            },
            EffectiveTheme::RetroArcade => Palette {
                bg: rgb(0x0d0d1a),
                content_bg: rgb(0x1a1a2e),
                border: rgb(0x333366),
                tier: [
                    rgb(0xff0060),
                    rgb(0xff9f00),
                    rgb(0xdfff00),
                    rgb(0x00ff60),
                    rgb(0x009fff),
                ],
            },
            EffectiveTheme::Twitch => Palette {
                bg: rgb(0x0e0e10),
                content_bg: rgb(0x18181b),
                border: rgb(0x2f2f35),
                tier: [
                    rgb(0x9147ff),
                    rgb(0xbf94ff),
                    rgb(0x00c8af),
                    rgb(0x1f69ff),
                    rgb(0xeb0400),
                ],
            },
            EffectiveTheme::Pastel => Palette {
                bg: rgb(0xfef7f0),
                content_bg: rgb(0xffffff),
                border: rgb(0xe8dff0),
                tier: [
                    rgb(0xff9aa2),
                    rgb(0xffc98b),
                    rgb(0xfff59d),
                    rgb(0x98fb98),
                    rgb(0xa0d2ff),
                ],
            },
            EffectiveTheme::Tangerine => Palette {
                bg: rgb(0xfff6ec),
                content_bg: rgb(0xffffff),
                border: rgb(0xe8e8e8),
                tier: [
                    rgb(0xe55a00),
                    rgb(0xe58500),
                    rgb(0xe5a030),
                    rgb(0xe5b860),
                    rgb(0xa88860),
                ],
            },
            EffectiveTheme::ComfortZone => Palette {
                bg: rgb(0xe8e0f0),
                content_bg: rgb(0xf5f0fa),
                border: rgb(0xd0c4e0),
                tier: [
                    rgb(0xc85088),
                    rgb(0x8b6ba8),
                    rgb(0x6ab8b8),
                    rgb(0xe8a850),
                    rgb(0xb8a0d0),
                ],
            },
            EffectiveTheme::Colorblind => Palette {
                bg: rgb(0xf5f5f5),
                content_bg: rgb(0xffffff),
                border: rgb(0xe0e0e0),
                tier: [
                    rgb(0x0077bb),
                    rgb(0x33bbee),
                    rgb(0xee7733),
                    rgb(0xee3377),
                    rgb(0x999999),
                ],
            },
        }
    }

    /// The opaque background transparent images are flattened onto during
    /// ingest, before the lossy re-encode.
    pub fn ingest_background(self) -> Rgba<u8> {
        match self {
            EffectiveTheme::Light => rgb(0xffffff),
            EffectiveTheme::Dark => rgb(0x1e293b),
            EffectiveTheme::Cyberpunk => rgb(0x12121a),
            EffectiveTheme::RetroArcade => rgb(0x1a1a2e),
            EffectiveTheme::Twitch => rgb(0x18181b),
            EffectiveTheme::Pastel => rgb(0xffffff),
            EffectiveTheme::Tangerine => rgb(0xffffff),
            EffectiveTheme::ComfortZone => rgb(0xf5f0fa),
            EffectiveTheme::Colorblind => rgb(0xffffff),
        }
    }
}
