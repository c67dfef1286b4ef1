use serenity::all::ReactionType;
use std::fmt;

/// A unicode emoji usable both inline and as a button emoji.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Icon {
    glyph: &'static str,
}

impl Icon {
    pub const fn new(glyph: &'static str) -> Self {
        Self { glyph }
    }

    pub fn as_reaction(&self) -> ReactionType {
        ReactionType::Unicode(self.glyph.to_string())
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph)
    }
}

pub mod icon {
    use super::Icon;

    pub const CHECK: Icon = Icon::new("✅");
    pub const ERROR: Icon = Icon::new("❌");
    pub const BELL: Icon = Icon::new("🔔");
    pub const GEAR: Icon = Icon::new("🔄");
    pub const GIFT: Icon = Icon::new("🎁");
    pub const ALARM: Icon = Icon::new("🏆");
    pub const TIMER: Icon = Icon::new("⏱️");
    pub const HASTAG: Icon = Icon::new("#️⃣");
}
