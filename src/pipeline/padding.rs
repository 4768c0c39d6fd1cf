//! Group padding, noise groups and chunk order prefixes.
//!
//! All random choices here come from the caller's entropy source. Decoding
//! never needs to reproduce them: pad symbols, the noise marker and the order
//! marker are reserved and recognised by value.

use crate::config::Markers;
use crate::error::{CubigmaError, Result};
use crate::lattice::{Coordinate, Lattice};
use crate::symbols::split_symbols;
use rand::seq::SliceRandom;
use rand::Rng;

/// Highest order number a single-digit prefix can carry
pub const MAX_ORDER_NUMBER: usize = 9;

/// Split the message into symbols and pad the last group to `group_size`
pub fn prep_string_for_encrypting<R: Rng + ?Sized>(
    message: &str,
    group_size: usize,
    pad_symbols: &[String],
    rng: &mut R,
) -> Result<String> {
    let mut symbols = split_symbols(message);
    if symbols.is_empty() {
        return Err(CubigmaError::EmptyInput);
    }
    while symbols.len() % group_size != 0 {
        let pad = pad_symbols
            .choose(rng)
            .ok_or_else(|| CubigmaError::validation("markers", "no pad symbols"))?;
        symbols.push(pad.clone());
    }
    Ok(symbols.concat())
}

/// Split text into groups of exactly `group_size` symbols
pub fn into_groups(text: &str, group_size: usize) -> Result<Vec<Vec<String>>> {
    let symbols = split_symbols(text);
    if symbols.len() % group_size != 0 {
        return Err(CubigmaError::InvalidCiphertext(format!(
            "{} symbols is not a whole number of {}-symbol groups",
            symbols.len(),
            group_size
        )));
    }
    Ok(symbols.chunks(group_size).map(<[String]>::to_vec).collect())
}

/// Noise marker plus random lattice symbols, shuffled
pub fn noise_group<R: Rng + ?Sized>(
    lattice: &Lattice,
    markers: &Markers,
    group_size: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let dims = lattice.dims();
    let mut group = Vec::with_capacity(group_size);
    group.push(markers.noise.clone());
    for _ in 1..group_size {
        let coord = Coordinate::new(
            rng.gen_range(0..dims.num_blocks),
            rng.gen_range(0..dims.lines_per_block),
            rng.gen_range(0..dims.symbols_per_line),
        );
        group.push(lattice.symbol_at(coord)?.to_string());
    }
    group.shuffle(rng);
    Ok(group)
}

/// Order digit plus `group_size - 1` order markers, shuffled
pub fn order_prefix<R: Rng + ?Sized>(
    order_number: usize,
    markers: &Markers,
    group_size: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    if order_number > MAX_ORDER_NUMBER {
        return Err(CubigmaError::validation(
            "order_number",
            format!("{} does not fit in one digit", order_number),
        ));
    }
    let mut group = vec![markers.order.clone(); group_size - 1];
    group.push(order_number.to_string());
    group.shuffle(rng);
    Ok(group)
}

/// Append noise groups until `chunk` holds `target_length` symbols, then
/// prepend the order prefix group
pub fn pad_chunk<R: Rng + ?Sized>(
    chunk: &str,
    target_length: usize,
    order_number: usize,
    rotor: &Lattice,
    markers: &Markers,
    group_size: usize,
    rng: &mut R,
) -> Result<String> {
    let mut symbols = split_symbols(chunk);
    if symbols.len() % group_size != 0 {
        return Err(CubigmaError::InvalidParameter(format!(
            "chunk of {} symbols is not whole groups of {}",
            symbols.len(),
            group_size
        )));
    }
    let mut padded = order_prefix(order_number, markers, group_size, rng)?;
    let digit = order_number.to_string();
    if !rotor.contains(&digit) {
        return Err(CubigmaError::SymbolNotFound(digit));
    }

    while symbols.len() < target_length {
        symbols.extend(noise_group(rotor, markers, group_size, rng)?);
    }
    padded.extend(symbols);
    Ok(padded.concat())
}

pub fn is_noise_group(group: &[String], markers: &Markers) -> bool {
    group.iter().any(|s| *s == markers.noise)
}

/// Recover the order number from a decoded prefix group
pub fn read_order_prefix(group: &[String], markers: &Markers) -> Result<usize> {
    let mut rest = group.iter().filter(|s| **s != markers.order);
    match (rest.next(), rest.next()) {
        (Some(digit), None) if group.len() > 1 => digit
            .parse::<usize>()
            .ok()
            .filter(|n| *n <= MAX_ORDER_NUMBER)
            .ok_or_else(|| {
                CubigmaError::InvalidCiphertext(format!("order prefix digit {:?}", digit))
            }),
        _ => Err(CubigmaError::InvalidCiphertext(
            "chunk does not start with an order prefix".into(),
        )),
    }
}

/// Concatenate decoded groups, dropping noise groups and pad symbols
pub fn strip_padding(groups: &[Vec<String>], markers: &Markers) -> String {
    groups
        .iter()
        .filter(|group| !is_noise_group(group, markers))
        .flatten()
        .filter(|symbol| !markers.is_pad(symbol))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Dimensions;
    use crate::symbols::{user_perceived_length, Alphabet};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn rotor() -> Lattice {
        Lattice::build(&Alphabet::standard(27).unwrap(), Dimensions::cube(3)).unwrap()
    }

    #[test]
    fn test_prep_pads_last_group() {
        let markers = Markers::default();
        let prepared = prep_string_for_encrypting("ab", 3, &markers.pad, &mut rng()).unwrap();
        assert_eq!(user_perceived_length(&prepared), 3);
        assert!(prepared.starts_with("ab"));
        let last = split_symbols(&prepared).pop().unwrap();
        assert!(markers.is_pad(&last));
    }

    #[test]
    fn test_prep_full_groups_untouched() {
        let markers = Markers::default();
        let prepared = prep_string_for_encrypting("abcdef", 3, &markers.pad, &mut rng()).unwrap();
        assert_eq!(prepared, "abcdef");
    }

    #[test]
    fn test_prep_counts_graphemes() {
        let markers = Markers::default();
        let prepared =
            prep_string_for_encrypting("👍🏽e\u{301}", 3, &markers.pad, &mut rng()).unwrap();
        assert_eq!(user_perceived_length(&prepared), 3);
        assert!(prepared.starts_with("👍🏽e\u{301}"));
    }

    #[test]
    fn test_prep_empty() {
        let markers = Markers::default();
        assert!(matches!(
            prep_string_for_encrypting("", 3, &markers.pad, &mut rng()),
            Err(CubigmaError::EmptyInput)
        ));
    }

    #[test]
    fn test_into_groups() {
        let groups = into_groups("abcdef", 3).unwrap();
        assert_eq!(groups, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
        assert!(matches!(
            into_groups("abcd", 3),
            Err(CubigmaError::InvalidCiphertext(_))
        ));
    }

    #[test]
    fn test_pad_chunk_layout() {
        let markers = Markers::default();
        let padded = pad_chunk("abc", 12, 4, &rotor(), &markers, 3, &mut rng()).unwrap();
        let groups = into_groups(&padded, 3).unwrap();
        assert_eq!(groups.len(), 5);
        assert_eq!(read_order_prefix(&groups[0], &markers).unwrap(), 4);
        assert_eq!(groups[1], vec!["a", "b", "c"]);
        for noise in &groups[2..] {
            assert!(is_noise_group(noise, &markers));
        }
        assert_eq!(strip_padding(&groups[1..], &markers), "abc");
    }

    #[test]
    fn test_pad_chunk_no_noise_when_long_enough() {
        let markers = Markers::default();
        let padded = pad_chunk("abcdef", 3, 0, &rotor(), &markers, 3, &mut rng()).unwrap();
        assert_eq!(user_perceived_length(&padded), 9);
    }

    #[test]
    fn test_pad_chunk_rejects_bad_input() {
        let markers = Markers::default();
        assert!(pad_chunk("ab", 6, 0, &rotor(), &markers, 3, &mut rng()).is_err());
        assert!(matches!(
            pad_chunk("abc", 6, 10, &rotor(), &markers, 3, &mut rng()),
            Err(CubigmaError::Validation { field: "order_number", .. })
        ));
    }

    #[test]
    fn test_order_prefix_roundtrip() {
        let markers = Markers::default();
        for n in 0..=MAX_ORDER_NUMBER {
            let prefix = order_prefix(n, &markers, 3, &mut rng()).unwrap();
            assert_eq!(prefix.iter().filter(|s| **s == markers.order).count(), 2);
            assert_eq!(read_order_prefix(&prefix, &markers).unwrap(), n);
        }
    }

    #[test]
    fn test_read_order_prefix_rejects_plain_group() {
        let markers = Markers::default();
        let group: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        assert!(read_order_prefix(&group, &markers).is_err());
    }

    #[test]
    fn test_strip_padding() {
        let markers = Markers::default();
        let groups = vec![
            vec!["h".to_string(), "i".to_string(), "·".to_string()],
            vec!["¤".to_string(), "x".to_string(), "y".to_string()],
        ];
        assert_eq!(strip_padding(&groups, &markers), "hi");
    }
}
