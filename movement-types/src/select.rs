//! Field-stepping helpers for the editor.
//!
//! Every editable field steps through a fixed ordered list of allowed
//! values. Which boundary policy applies is a per-field decision (degree,
//! tonic and preset index wrap; octave, beats and the control row clamp),
//! so both policies are exposed rather than one unified helper.

/// Step `current` through `choices` by `dir` (-1, 0, +1), clamping at both
/// ends. Unknown `current` is treated as the first choice.
pub fn step_clamped<T: Copy + PartialEq>(current: T, choices: &[T], dir: i32) -> T {
    let index = choices.iter().position(|c| *c == current).unwrap_or(0);
    let stepped = (index as i64 + dir as i64).clamp(0, choices.len() as i64 - 1);
    choices[stepped as usize]
}

/// Step `current` through `choices` by `dir` (-1, 0, +1), wrapping around
/// at both ends. Unknown `current` is treated as the first choice.
pub fn step_wrapped<T: Copy + PartialEq>(current: T, choices: &[T], dir: i32) -> T {
    let index = choices.iter().position(|c| *c == current).unwrap_or(0);
    let len = choices.len() as i64;
    let stepped = (index as i64 + dir as i64).rem_euclid(len);
    choices[stepped as usize]
}

/// Wrap an index delta over a collection of `len` items.
pub fn wrap_index(index: usize, len: usize, dir: i32) -> usize {
    debug_assert!(len > 0);
    (index as i64 + dir as i64).rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: [char; 3] = ['a', 'b', 'c'];

    #[test]
    fn clamped_steps_within_range() {
        assert_eq!(step_clamped('a', &ABC, 1), 'b');
        assert_eq!(step_clamped('b', &ABC, -1), 'a');
    }

    #[test]
    fn clamped_sticks_at_ends() {
        assert_eq!(step_clamped('a', &ABC, -1), 'a');
        assert_eq!(step_clamped('c', &ABC, 1), 'c');
    }

    #[test]
    fn wrapped_goes_around() {
        assert_eq!(step_wrapped('a', &ABC, -1), 'c');
        assert_eq!(step_wrapped('c', &ABC, 1), 'a');
    }

    #[test]
    fn dir_zero_is_identity() {
        assert_eq!(step_clamped('b', &ABC, 0), 'b');
        assert_eq!(step_wrapped('b', &ABC, 0), 'b');
    }

    #[test]
    fn unknown_current_starts_at_first() {
        assert_eq!(step_clamped('z', &ABC, 1), 'b');
    }

    #[test]
    fn wrap_index_both_directions() {
        assert_eq!(wrap_index(0, 4, -1), 3);
        assert_eq!(wrap_index(3, 4, 1), 0);
        assert_eq!(wrap_index(2, 4, 0), 2);
    }
}
