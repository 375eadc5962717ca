use num::{PrimInt, Unsigned};

/// Abstraction layer for common bitwise operations on an occupation word.
/// # Purpose
/// The BitOps trait brings in scope the few bit manipulations the basis and
/// the Hamiltonian need on a single spin sector. Slots are indexed from the
/// least significant bit: slot $k$ is the bit $2^k$.
pub trait BitOps:
    PrimInt +
    Unsigned +
    std::ops::BitXorAssign +
    std::ops::BitAndAssign +
    std::ops::BitOrAssign +
    std::fmt::Debug +
    std::fmt::Binary +
    Send +
    Sync
{
    /// Number of bits available in the word.
    fn n_bits() -> usize;
    /// Single-bit mask for the given slot.
    fn bitmask(slot: usize) -> Self;
    /// Returns the truth value at slot $k$. This method is consistent with
    /// [BitOps::set] and [BitOps::bitmask].
    fn check(&self, slot: usize) -> bool;
    /// Toggles the bit at slot $k$.
    fn set(&mut self, slot: usize);
    /// Number of set bits strictly between the two slots, in either order.
    fn count_between(self, a: usize, b: usize) -> u32;
    /// Number of set bits on slots strictly lower than `slot`.
    fn count_below(self, slot: usize) -> u32;
    /// Number of set bits on slots strictly higher than `slot`.
    fn count_above(self, slot: usize) -> u32;
}

/// BitWise operations for all unsigned primitive ints. All methods are inlined
/// and use built-in methods.
impl<I> BitOps for I
    where I: PrimInt + Unsigned + std::ops::BitXorAssign + std::ops::BitAndAssign
    + std::ops::BitOrAssign + std::fmt::Debug + std::fmt::Binary + Send + Sync
{
    #[inline(always)]
    fn n_bits() -> usize {
        std::mem::size_of::<I>() * u8::BITS as usize
    }
    #[inline(always)]
    fn bitmask(slot: usize) -> Self {
        <I>::one() << slot
    }
    #[inline(always)]
    fn check(&self, slot: usize) -> bool {
        if slot >= <I as BitOps>::n_bits() {return false;}
        *self & <I as BitOps>::bitmask(slot) != <I>::zero()
    }
    #[inline(always)]
    fn set(&mut self, slot: usize) {
        *self ^= <I as BitOps>::bitmask(slot);
    }
    #[inline(always)]
    fn count_between(self, a: usize, b: usize) -> u32 {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        if hi - lo < 2 {
            return 0;
        }
        // Bits [lo + 1, hi)
        let below_hi = <I as BitOps>::bitmask(hi) - <I>::one();
        let upto_lo = (<I as BitOps>::bitmask(lo) - <I>::one()) | <I as BitOps>::bitmask(lo);
        (self & below_hi & !upto_lo).count_ones()
    }
    #[inline(always)]
    fn count_below(self, slot: usize) -> u32 {
        (self & (<I as BitOps>::bitmask(slot) - <I>::one())).count_ones()
    }
    #[inline(always)]
    fn count_above(self, slot: usize) -> u32 {
        if slot + 1 >= <I as BitOps>::n_bits() {
            return 0;
        }
        (self >> (slot + 1)).count_ones()
    }
}

/// The Fock state structure. Encodes the occupied modes of both spin species.
/// # Definition
/// This structure has two different fields, the spin up and spin down
/// occupation words. Each of these fields is a bitstring where slot
/// $k = \text{site}\times N_o + \text{orbital}$ is set when the mode is
/// occupied. The convention for the many-body state is
///
/// $$
/// \vert x\rangle = \prod_{k\in\text{up}}c^\dagger_{k\uparrow}
/// \prod_{k\in\text{down}}c^\dagger_{k\downarrow}\vert 0\rangle
/// $$
///
/// with both products in increasing slot order.
/// # Usage
/// ```rust
/// use exactdiag::{FockState, Spin};
/// let state = FockState { spin_up: 5u8, spin_down: 2u8, n_slots: 4 };
/// assert_eq!(state.word(Spin::Down), 2u8);
/// assert_eq!(format!("{}", state), "↑1010 ↓0100");
/// ```
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub struct FockState<T>
{
    pub spin_up: T,
    pub spin_down: T,
    pub n_slots: usize,
}

impl<T: Copy> FockState<T> {
    /// Word of the requested spin sector.
    #[inline(always)]
    pub fn word(&self, spin: Spin) -> T {
        match spin {
            Spin::Up => self.spin_up,
            Spin::Down => self.spin_down,
        }
    }

    /// Copy of the state with the word of `spin` replaced.
    #[inline(always)]
    pub fn with_word(&self, spin: Spin, word: T) -> Self {
        match spin {
            Spin::Up => FockState { spin_up: word, ..*self },
            Spin::Down => FockState { spin_down: word, ..*self },
        }
    }
}

impl<T: BitOps> std::fmt::Display for FockState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{} {}{}",
            strings::UPARROW, strings::occupations(self.spin_up, self.n_slots),
            strings::DOWNARROW, strings::occupations(self.spin_down, self.n_slots))
    }
}
