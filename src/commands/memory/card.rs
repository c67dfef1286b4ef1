/// The eight faces a card can show. Every board holds exactly two of each.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Symbol {
    Apple,
    Banana,
    Grapes,
    Strawberry,
    Cherries,
    Peach,
    Watermelon,
    Kiwi,
}

impl Symbol {
    pub const ALL: [Symbol; 8] = [
        Symbol::Apple,
        Symbol::Banana,
        Symbol::Grapes,
        Symbol::Strawberry,
        Symbol::Cherries,
        Symbol::Peach,
        Symbol::Watermelon,
        Symbol::Kiwi,
    ];

    pub const fn emoji(self) -> &'static str {
        match self {
            Symbol::Apple => "🍎",
            Symbol::Banana => "🍌",
            Symbol::Grapes => "🍇",
            Symbol::Strawberry => "🍓",
            Symbol::Cherries => "🍒",
            Symbol::Peach => "🍑",
            Symbol::Watermelon => "🍉",
            Symbol::Kiwi => "🥝",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Card {
    pub symbol: Symbol,
    pub face_up: bool,
    pub matched: bool,
}

impl Card {
    pub const fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            face_up: false,
            matched: false,
        }
    }

    /// Face-up but not yet part of a found pair.
    pub fn is_pending(&self) -> bool {
        self.face_up && !self.matched
    }
}
