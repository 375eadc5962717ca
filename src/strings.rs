use crate::BitOps;

/// Uparrow character unicode
pub const UPARROW: char = match std::char::from_u32(0x00002191) {
    Some(v) => v,
    None => panic!("Invalid unicode character uparrow"),
};
/// Downarrow character unicode
pub const DOWNARROW: char = match std::char::from_u32(0x00002193) {
    Some(v) => v,
    None => panic!("Invalid unicode character downarrow"),
};

/// Occupation of the first `n_slots` slots of a word, slot 0 first.
/// ```rust
/// use exactdiag::strings::occupations;
/// assert_eq!(occupations(0b0110u8, 5), "01100");
/// ```
pub fn occupations<T: BitOps>(word: T, n_slots: usize) -> String {
    (0..n_slots)
        .map(|k| if word.check(k) { '1' } else { '0' })
        .collect()
}
