//! Open Location Code ("plus codes").
//!
//! A full code is 10 pair digits (alternating latitude/longitude in base 20,
//! starting at 20° cells) followed by up to 5 grid digits that split the cell
//! into 5 rows × 4 columns each. A `+` follows the eighth digit; codes shorter
//! than eight digits are padded with `0`. Short codes drop leading digits and
//! need a nearby reference point to be recovered.

use crate::coord::Coordinate;
use crate::error::OlcError;

const ALPHABET: &[u8; 20] = b"23456789CFGHJMPQRVWX";
const SEPARATOR: char = '+';
const SEPARATOR_POSITION: usize = 8;
const PADDING: char = '0';
const ENCODING_BASE: f64 = 20.0;
const BASE: i64 = 20;
const PAIR_CODE_LENGTH: usize = 10;
const GRID_CODE_LENGTH: usize = 5;
const MAX_DIGIT_COUNT: usize = 15;
const GRID_ROWS: usize = 5;
const GRID_COLUMNS: usize = 4;
const LAT_MAX: f64 = 90.0;
const LON_MAX: f64 = 180.0;
// Finest-grid cells per degree: 8000 * 5^5 and 8000 * 4^5.
const LAT_UNITS: i64 = 25_000_000;
const LON_UNITS: i64 = 8_192_000;

/// The cell a code decodes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeArea {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
    /// Significant digits in the code, excluding separator and padding.
    pub code_length: usize,
}

impl CodeArea {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            ((self.south + self.north) / 2.0).min(LAT_MAX),
            ((self.west + self.east) / 2.0).min(LON_MAX),
        )
    }
}

fn digit_value(ch: u8) -> Option<usize> {
    let ch = ch.to_ascii_uppercase();
    ALPHABET.iter().position(|&a| a == ch)
}

fn clip_latitude(lat: f64) -> f64 {
    lat.clamp(-LAT_MAX, LAT_MAX)
}

fn normalize_longitude(lon: f64) -> f64 {
    (lon + LON_MAX).rem_euclid(2.0 * LON_MAX) - LON_MAX
}

pub fn is_valid(code: &str) -> bool {
    if code.len() < 2 || !code.is_ascii() {
        return false;
    }
    let sep = match code.find(SEPARATOR) {
        Some(i) if code.rfind(SEPARATOR) == Some(i) => i,
        _ => return false,
    };
    if sep > SEPARATOR_POSITION || sep % 2 == 1 {
        return false;
    }

    if let Some(pad_first) = code.find(PADDING) {
        // Padding only appears in full-length prefixes such as "8Q9J0000+".
        if sep < SEPARATOR_POSITION || pad_first == 0 || pad_first % 2 == 1 {
            return false;
        }
        let pad_last = code.rfind(PADDING).unwrap_or(pad_first);
        if code[pad_first..=pad_last].chars().any(|c| c != PADDING) {
            return false;
        }
        if !code.ends_with(SEPARATOR) {
            return false;
        }
    }

    // A single digit after the separator is ambiguous.
    if code.len() - sep - 1 == 1 {
        return false;
    }

    code.bytes()
        .all(|b| b == SEPARATOR as u8 || b == PADDING as u8 || digit_value(b).is_some())
}

pub fn is_short(code: &str) -> bool {
    is_valid(code) && code.find(SEPARATOR).is_some_and(|sep| sep < SEPARATOR_POSITION)
}

pub fn is_full(code: &str) -> bool {
    if !is_valid(code) || is_short(code) {
        return false;
    }
    let bytes = code.as_bytes();
    // First digits must stay within the 180° x 360° range.
    let lat_ok = digit_value(bytes[0]).is_some_and(|v| (v as f64) * ENCODING_BASE < 2.0 * LAT_MAX);
    let lon_ok = bytes.len() < 2
        || digit_value(bytes[1]).map_or(true, |v| (v as f64) * ENCODING_BASE < 2.0 * LON_MAX);
    lat_ok && lon_ok
}

/// Encode `c` as a code with `code_length` significant digits.
///
/// Valid lengths are 2, 4, 6, 8 and 10..=15 (longer requests are capped).
pub fn encode(c: Coordinate, code_length: usize) -> Result<String, OlcError> {
    if !c.is_finite() {
        return Err(OlcError::NonFiniteCoordinate);
    }
    if code_length < 2 || (code_length < PAIR_CODE_LENGTH && code_length % 2 == 1) {
        return Err(OlcError::InvalidLength(code_length));
    }
    let code_length = code_length.min(MAX_DIGIT_COUNT);

    // Whole cells of the finest grid level; the north pole folds into the top row.
    let lat = clip_latitude(c.lat) + LAT_MAX;
    let lon = normalize_longitude(c.lon) + LON_MAX;
    let mut lat_val = ((lat * LAT_UNITS as f64).floor() as i64).clamp(0, 180 * LAT_UNITS - 1);
    let mut lon_val = ((lon * LON_UNITS as f64).floor() as i64).clamp(0, 360 * LON_UNITS - 1);

    let mut reversed = Vec::with_capacity(MAX_DIGIT_COUNT);
    if code_length > PAIR_CODE_LENGTH {
        for _ in 0..GRID_CODE_LENGTH {
            let row = (lat_val % GRID_ROWS as i64) as usize;
            let col = (lon_val % GRID_COLUMNS as i64) as usize;
            reversed.push(ALPHABET[row * GRID_COLUMNS + col]);
            lat_val /= GRID_ROWS as i64;
            lon_val /= GRID_COLUMNS as i64;
        }
    } else {
        lat_val /= (GRID_ROWS as i64).pow(GRID_CODE_LENGTH as u32);
        lon_val /= (GRID_COLUMNS as i64).pow(GRID_CODE_LENGTH as u32);
    }
    for _ in 0..PAIR_CODE_LENGTH / 2 {
        reversed.push(ALPHABET[(lon_val % BASE) as usize]);
        reversed.push(ALPHABET[(lat_val % BASE) as usize]);
        lat_val /= BASE;
        lon_val /= BASE;
    }

    let digits: String = reversed
        .into_iter()
        .rev()
        .take(code_length)
        .map(char::from)
        .collect();
    if digits.len() < SEPARATOR_POSITION {
        let padding = PADDING.to_string().repeat(SEPARATOR_POSITION - digits.len());
        Ok(format!("{digits}{padding}{SEPARATOR}"))
    } else {
        let (head, tail) = digits.split_at(SEPARATOR_POSITION);
        Ok(format!("{head}{SEPARATOR}{tail}"))
    }
}

/// Decode a full code into the cell it names.
pub fn decode(code: &str) -> Result<CodeArea, OlcError> {
    if !is_full(code) {
        return Err(OlcError::NotFullCode(code.to_string()));
    }
    let clean: Vec<i64> = code
        .bytes()
        .filter(|&b| b != SEPARATOR as u8 && b != PADDING as u8)
        .take(MAX_DIGIT_COUNT)
        .filter_map(digit_value)
        .map(|v| v as i64)
        .collect();

    let mut lat_int = 0_i64;
    let mut lon_int = 0_i64;
    let mut lat_place = 20 * LAT_UNITS * BASE;
    let mut lon_place = 20 * LON_UNITS * BASE;

    let pair_len = clean.len().min(PAIR_CODE_LENGTH);
    for pair in clean[..pair_len].chunks_exact(2) {
        lat_place /= BASE;
        lon_place /= BASE;
        lat_int += pair[0] * lat_place;
        lon_int += pair[1] * lon_place;
    }
    for &value in &clean[pair_len..] {
        lat_place /= GRID_ROWS as i64;
        lon_place /= GRID_COLUMNS as i64;
        lat_int += value / GRID_COLUMNS as i64 * lat_place;
        lon_int += value % GRID_COLUMNS as i64 * lon_place;
    }

    let lat_deg = |v: i64| v as f64 / LAT_UNITS as f64 - LAT_MAX;
    let lon_deg = |v: i64| v as f64 / LON_UNITS as f64 - LON_MAX;
    Ok(CodeArea {
        south: lat_deg(lat_int),
        west: lon_deg(lon_int),
        north: lat_deg(lat_int + lat_place),
        east: lon_deg(lon_int + lon_place),
        code_length: clean.len(),
    })
}

/// Expand a short code to the full code nearest to `reference`.
///
/// Full codes are returned upper-cased and otherwise unchanged.
pub fn recover_nearest(code: &str, reference: Coordinate) -> Result<String, OlcError> {
    if !is_short(code) {
        return if is_full(code) {
            Ok(code.to_ascii_uppercase())
        } else {
            Err(OlcError::InvalidCode(code.to_string()))
        };
    }
    if !reference.is_finite() {
        return Err(OlcError::NonFiniteCoordinate);
    }

    let ref_lat = clip_latitude(reference.lat);
    let ref_lon = normalize_longitude(reference.lon);
    let code = code.to_ascii_uppercase();

    let sep = code.find(SEPARATOR).unwrap_or(SEPARATOR_POSITION);
    let padding_length = SEPARATOR_POSITION - sep;
    // Size of the cell the missing leading digits would select.
    let resolution = ENCODING_BASE.powi(2 - (padding_length / 2) as i32);
    let half = resolution / 2.0;

    let prefix = encode(Coordinate::new(ref_lat, ref_lon), PAIR_CODE_LENGTH)?;
    let area = decode(&format!("{}{}", &prefix[..padding_length], code))?;
    let Coordinate {
        lat: mut lat,
        lon: mut lon,
    } = area.center();

    // Move to the neighbouring cell if it is closer to the reference.
    if ref_lat + half < lat && lat - resolution >= -LAT_MAX {
        lat -= resolution;
    } else if ref_lat - half > lat && lat + resolution <= LAT_MAX {
        lat += resolution;
    }
    if ref_lon + half < lon {
        lon -= resolution;
    } else if ref_lon - half > lon {
        lon += resolution;
    }

    encode(Coordinate::new(lat, lon), area.code_length)
}

/// Centre of the area named by `code`, recovering short codes near `near`.
pub fn olc_to_coordinate(code: &str, near: Coordinate) -> Result<Coordinate, OlcError> {
    let full = recover_nearest(code, near)?;
    Ok(decode(&full)?.center())
}
