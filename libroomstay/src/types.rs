//! Core types for Roomstay

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::path::Path;

use crate::error::{Result, RoomstayError};

// ============================================================================
// Money
// ============================================================================

/// An amount in the currency's minor units (e.g. paisa for NPR)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn minor(amount: i64) -> Self {
        Self(amount)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_mul(self, rhs: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(rhs)).map(Money)
    }
}

/// # Panics
///
/// On `i64` overflow. Use [`Money::checked_add`] for untrusted amounts.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self.checked_add(rhs)
            .unwrap_or_else(|| panic!("money overflow: {} + {}", self, rhs))
    }
}

/// # Panics
///
/// On `i64` overflow. Use [`Money::checked_mul`] for untrusted amounts.
impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        self.checked_mul(rhs)
            .unwrap_or_else(|| panic!("money overflow: {} * {}", self, rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Prices charged for a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    #[serde(alias = "price")]
    pub nightly_price: Money,
    #[serde(default)]
    pub cleaning_fee: Option<Money>,
    #[serde(default)]
    pub service_fee: Option<Money>,
}

impl FeeSchedule {
    pub fn nightly(nightly_price: Money) -> Self {
        Self {
            nightly_price,
            cleaning_fee: None,
            service_fee: None,
        }
    }

    pub fn with_cleaning_fee(mut self, fee: Money) -> Self {
        self.cleaning_fee = Some(fee);
        self
    }

    pub fn with_service_fee(mut self, fee: Money) -> Self {
        self.service_fee = Some(fee);
        self
    }
}

/// A bookable room as resolved by the listing-detail fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing slug
    #[serde(alias = "slug")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub fees: FeeSchedule,
    /// Maximum adults + children + infants
    pub max_guests: u32,
    /// Host accepts check-out on the check-in day (priced as one night)
    #[serde(default)]
    pub same_day_stays: bool,
}

impl Listing {
    pub fn new(id: impl Into<String>, fees: FeeSchedule, max_guests: u32) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            fees,
            max_guests,
            same_day_stays: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn allowing_same_day_stays(mut self) -> Self {
        self.same_day_stays = true;
        self
    }
}

// ============================================================================
// Guests
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestKind {
    Adults,
    Children,
    Infants,
    Pets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub pets: u32,
}

impl Default for GuestCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
            pets: 0,
        }
    }
}

impl GuestCounts {
    pub fn none() -> Self {
        Self {
            adults: 0,
            children: 0,
            infants: 0,
            pets: 0,
        }
    }

    /// People occupying the room; pets are not counted
    ///
    /// Widened to `u64` so no combination of counts can wrap.
    pub fn total(&self) -> u64 {
        u64::from(self.adults) + u64::from(self.children) + u64::from(self.infants)
    }

    pub fn get(&self, kind: GuestKind) -> u32 {
        match kind {
            GuestKind::Adults => self.adults,
            GuestKind::Children => self.children,
            GuestKind::Infants => self.infants,
            GuestKind::Pets => self.pets,
        }
    }

    pub fn set(&mut self, kind: GuestKind, count: u32) {
        match kind {
            GuestKind::Adults => self.adults = count,
            GuestKind::Children => self.children = count,
            GuestKind::Infants => self.infants = count,
            GuestKind::Pets => self.pets = count,
        }
    }

    pub fn increment(&mut self, kind: GuestKind) {
        self.set(kind, self.get(kind).saturating_add(1));
    }

    /// Decrement, stopping at zero
    pub fn decrement(&mut self, kind: GuestKind) {
        self.set(kind, self.get(kind).saturating_sub(1));
    }
}

// ============================================================================
// Payment proof attachment
// ============================================================================

/// Supported image MIME types for the payment screenshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl ImageMimeType {
    /// Parse MIME type from a MIME string (e.g., "image/jpeg")
    pub fn from_mime_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detect MIME type from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }
}

impl fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Screenshot proving the guest paid, attached to a booking
///
/// Only a reference to the file is held; the gateway reads the bytes when
/// it uploads. `file_hash` lets it detect the file changing underneath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub file_path: String,
    pub file_name: String,
    pub mime_type: ImageMimeType,
    pub file_size: u64,
    /// SHA-256 of the content, hex encoded
    pub file_hash: String,
}

impl PaymentProof {
    /// Reference an image on disk
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the extension is not a supported image type
    /// or the file is empty, and `InvalidInput` wrapping the IO error if it
    /// can't be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageMimeType::from_extension)
            .ok_or_else(|| {
                RoomstayError::InvalidInput(format!(
                    "Unsupported payment screenshot type: {}",
                    path.display()
                ))
            })?;

        let bytes = std::fs::read(path).map_err(|e| {
            RoomstayError::InvalidInput(format!(
                "Cannot read payment screenshot {}: {}",
                path.display(),
                e
            ))
        })?;
        if bytes.is_empty() {
            return Err(RoomstayError::InvalidInput(format!(
                "Payment screenshot is empty: {}",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file_path: path.to_string_lossy().into_owned(),
            file_name,
            mime_type,
            file_size: bytes.len() as u64,
            file_hash: sha256_hex(&bytes),
        })
    }

    /// Read the referenced file, failing if it no longer matches the recorded hash
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        let bytes = std::fs::read(&self.file_path).map_err(|e| {
            RoomstayError::InvalidInput(format!(
                "Cannot read payment screenshot {}: {}",
                self.file_path, e
            ))
        })?;
        if sha256_hex(&bytes) != self.file_hash {
            return Err(RoomstayError::InvalidInput(format!(
                "Payment screenshot changed since it was attached: {}",
                self.file_path
            )));
        }
        Ok(bytes)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_money_arithmetic() {
        let nightly = Money::minor(10_000);
        assert_eq!(nightly * 3, Money::minor(30_000));
        assert_eq!(nightly + Money::minor(500), Money::minor(10_500));
        let total: Money = vec![Money(1), Money(2), Money(3)].into_iter().sum();
        assert_eq!(total, Money(6));
    }

    #[test]
    fn test_money_checked_arithmetic() {
        assert_eq!(Money(i64::MAX).checked_add(Money(1)), None);
        assert_eq!(Money(i64::MAX / 2).checked_mul(3), None);
        assert_eq!(Money(7).checked_mul(3), Some(Money(21)));
    }

    #[test]
    #[should_panic(expected = "money overflow")]
    fn test_money_add_overflow_panics() {
        let _ = Money(i64::MAX) + Money(1);
    }

    #[test]
    fn test_guest_total_does_not_wrap() {
        let guests = GuestCounts {
            adults: u32::MAX,
            children: 2,
            infants: u32::MAX,
            pets: 0,
        };
        assert_eq!(guests.total(), 2 * u64::from(u32::MAX) + 2);
    }

    #[test]
    fn test_money_serializes_as_integer() {
        let json = serde_json::to_string(&Money(3300)).unwrap();
        assert_eq!(json, "3300");
    }

    #[test]
    fn test_guest_total_excludes_pets() {
        let guests = GuestCounts {
            adults: 2,
            children: 1,
            infants: 1,
            pets: 3,
        };
        assert_eq!(guests.total(), 4);
    }

    #[test]
    fn test_guest_decrement_floors_at_zero() {
        let mut guests = GuestCounts::none();
        guests.decrement(GuestKind::Children);
        assert_eq!(guests.children, 0);
        guests.increment(GuestKind::Children);
        guests.increment(GuestKind::Children);
        guests.decrement(GuestKind::Children);
        assert_eq!(guests.children, 1);
    }

    #[test]
    fn test_default_guests_is_one_adult() {
        let guests = GuestCounts::default();
        assert_eq!(guests.adults, 1);
        assert_eq!(guests.total(), 1);
    }

    #[test]
    fn test_mime_detection() {
        assert_eq!(ImageMimeType::from_extension("JPG"), Some(ImageMimeType::Jpeg));
        assert_eq!(ImageMimeType::from_mime_str("image/webp"), Some(ImageMimeType::WebP));
        assert_eq!(ImageMimeType::from_extension("pdf"), None);
    }

    #[test]
    fn test_payment_proof_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("receipt.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let proof = PaymentProof::from_path(&path).unwrap();
        assert_eq!(proof.file_name, "receipt.png");
        assert_eq!(proof.mime_type, ImageMimeType::Png);
        assert_eq!(proof.file_size, 16);
        assert_eq!(proof.file_hash.len(), 64);
        assert_eq!(proof.read_bytes().unwrap(), b"not really a png");
    }

    #[test]
    fn test_payment_proof_rejects_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("receipt.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let result = PaymentProof::from_path(&path);
        assert!(matches!(result, Err(RoomstayError::InvalidInput(_))));
    }

    #[test]
    fn test_payment_proof_rejects_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("receipt.jpg");
        std::fs::write(&path, b"").unwrap();

        let result = PaymentProof::from_path(&path);
        assert!(matches!(result, Err(RoomstayError::InvalidInput(_))));
    }

    #[test]
    fn test_payment_proof_detects_modified_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("receipt.jpg");
        std::fs::write(&path, b"original").unwrap();
        let proof = PaymentProof::from_path(&path).unwrap();

        std::fs::write(&path, b"replaced").unwrap();
        assert!(proof.read_bytes().is_err());
    }
}
