//! Barcode symbologies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Barcode symbology a record was decoded from.
///
/// Wire names follow the mobile scanner plugins (`QR_CODE`, `CODE_128`, ...),
/// so collections persisted by the app can be read back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    #[serde(rename = "AZTEC")]
    Aztec,
    #[serde(rename = "CODABAR")]
    Codabar,
    #[serde(rename = "CODE_39")]
    Code39,
    #[serde(rename = "CODE_93")]
    Code93,
    #[serde(rename = "CODE_128")]
    Code128,
    #[serde(rename = "DATA_MATRIX")]
    DataMatrix,
    #[serde(rename = "EAN_8")]
    Ean8,
    #[serde(rename = "EAN_13")]
    Ean13,
    #[serde(rename = "ITF")]
    Itf,
    #[serde(rename = "PDF_417")]
    Pdf417,
    #[serde(rename = "QR_CODE")]
    QrCode,
    #[serde(rename = "UPC_A")]
    UpcA,
    #[serde(rename = "UPC_E")]
    UpcE,
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl BarcodeFormat {
    /// All concrete symbologies (everything but `Unknown`).
    pub const ALL: [BarcodeFormat; 13] = [
        BarcodeFormat::Aztec,
        BarcodeFormat::Codabar,
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Code128,
        BarcodeFormat::DataMatrix,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean13,
        BarcodeFormat::Itf,
        BarcodeFormat::Pdf417,
        BarcodeFormat::QrCode,
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
    ];

    /// Returns the wire name, e.g. `QR_CODE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeFormat::Aztec => "AZTEC",
            BarcodeFormat::Codabar => "CODABAR",
            BarcodeFormat::Code39 => "CODE_39",
            BarcodeFormat::Code93 => "CODE_93",
            BarcodeFormat::Code128 => "CODE_128",
            BarcodeFormat::DataMatrix => "DATA_MATRIX",
            BarcodeFormat::Ean8 => "EAN_8",
            BarcodeFormat::Ean13 => "EAN_13",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::Pdf417 => "PDF_417",
            BarcodeFormat::QrCode => "QR_CODE",
            BarcodeFormat::UpcA => "UPC_A",
            BarcodeFormat::UpcE => "UPC_E",
            BarcodeFormat::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarcodeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        BarcodeFormat::ALL
            .iter()
            .chain(std::iter::once(&BarcodeFormat::Unknown))
            .find(|format| format.as_str() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown barcode format: {}", s))
    }
}
