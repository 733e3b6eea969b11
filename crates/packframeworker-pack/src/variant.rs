use strum::IntoEnumIterator;

/// A build tier of the modpack.
///
/// Tiers stack on top of each other: [`Server`] is the base, [`Nano`] adds
/// client-side mods on top of it and [`Giga`] adds the heavy stuff on top of
/// [`Nano`]. Iteration order ([`strum::IntoEnumIterator`]) is the build
/// order.
///
/// [`Server`]: Variant::Server
/// [`Nano`]: Variant::Nano
/// [`Giga`]: Variant::Giga
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    Server,
    Nano,
    Giga,
}

impl Variant {
    /// The shared `mod/<loader>/all/<layer>` directories this variant is made
    /// of, lowest precedence first.
    pub fn layers(self) -> impl Iterator<Item = Self> {
        Self::iter().filter(move |layer| *layer <= self)
    }

    /// Whether this variant ships to players, as opposed to a dedicated server.
    #[must_use]
    pub const fn is_client(self) -> bool {
        matches!(self, Self::Nano | Self::Giga)
    }
}
