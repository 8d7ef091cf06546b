/// Edge weights and accumulated path costs.
///
/// Costs are unsigned, so negative weights can't be expressed, and adding
/// saturates at `max_value()`, which doubles as "unreachable".
pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + num_traits::SaturatingAdd
    + num_traits::bounds::UpperBounded
    + num_traits::Zero
    + num_traits::One
    + num_traits::Unsigned
    + num_traits::ToPrimitive
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::AddAssign
{
    /// Whether this is a reachable cost.
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != num_traits::bounds::UpperBounded::max_value()
    }

    /// Whether this can weigh a single step: at least one and finite.
    #[inline(always)]
    fn valid_step(&self) -> bool {
        self.valid() && *self >= Self::one()
    }

    /// The "unreachable" cost.
    #[inline(always)]
    fn infinity() -> Self {
        num_traits::bounds::UpperBounded::max_value()
    }
}

impl Cost for u16 {}
impl Cost for u32 {}
impl Cost for u64 {}
