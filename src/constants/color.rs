use serenity::all::Colour;

pub const MOON: Colour = Colour::new(0xA6B1E1);
