//! zbar sidecar decoder.
//!
//! Decoding is delegated to the `zbarimg` (still images) and `zbarcam`
//! (camera) executables. Both print one `SYMBOLOGY:payload` line per code;
//! payloads spanning several lines (vCards) continue on the following lines.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

use qrscan_core::config::DecoderConfig;
use qrscan_core::error::{Result, ScanError};
use qrscan_core::platform::{ImageDecoder, LiveDecoder, SupportProbe};
use qrscan_core::record::{BarcodeFormat, ScannedBarcode};

/// zbarimg exit status when the image contains no barcode.
const ZBARIMG_NOTHING_FOUND: i32 = 4;

/// Runs zbar executables as the live and image decode providers.
#[derive(Debug, Clone)]
pub struct ZbarDecoder {
    zbarimg: String,
    zbarcam: String,
    video_device: PathBuf,
}

impl ZbarDecoder {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            zbarimg: config.zbarimg.clone(),
            zbarcam: config.zbarcam.clone(),
            video_device: config.video_device.clone(),
        }
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<Output> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        tracing::debug!("[Zbar] Executing {} {:?}", program, args);

        cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScanError::provider("decoder", format!("{} is not installed", program))
            } else {
                ScanError::provider("decoder", format!("Failed to execute {}: {}", program, e))
            }
        })
    }

    async fn is_available(&self, program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// zbar symbology config name (`-S<name>.enable`) for a format.
fn zbar_config_name(format: BarcodeFormat) -> Option<&'static str> {
    match format {
        BarcodeFormat::QrCode => Some("qrcode"),
        BarcodeFormat::Ean8 => Some("ean8"),
        BarcodeFormat::Ean13 => Some("ean13"),
        BarcodeFormat::UpcA => Some("upca"),
        BarcodeFormat::UpcE => Some("upce"),
        BarcodeFormat::Code39 => Some("code39"),
        BarcodeFormat::Code93 => Some("code93"),
        BarcodeFormat::Code128 => Some("code128"),
        BarcodeFormat::Codabar => Some("codabar"),
        BarcodeFormat::Itf => Some("i25"),
        BarcodeFormat::Pdf417 => Some("pdf417"),
        BarcodeFormat::Aztec | BarcodeFormat::DataMatrix | BarcodeFormat::Unknown => None,
    }
}

/// Maps a zbar output symbology to a format.
fn format_from_symbology(symbology: &str) -> Option<BarcodeFormat> {
    let format = match symbology {
        "QR-Code" => BarcodeFormat::QrCode,
        "EAN-8" => BarcodeFormat::Ean8,
        "EAN-13" | "ISBN-10" | "ISBN-13" => BarcodeFormat::Ean13,
        "UPC-A" => BarcodeFormat::UpcA,
        "UPC-E" => BarcodeFormat::UpcE,
        "CODE-39" => BarcodeFormat::Code39,
        "CODE-93" => BarcodeFormat::Code93,
        "CODE-128" => BarcodeFormat::Code128,
        "Codabar" | "CODABAR" => BarcodeFormat::Codabar,
        "I2/5" => BarcodeFormat::Itf,
        "PDF417" => BarcodeFormat::Pdf417,
        "DataBar" | "DataBar-Exp" | "SQ-Code" => BarcodeFormat::Unknown,
        _ => return None,
    };
    Some(format)
}

/// Parses zbar's `SYMBOLOGY:payload` output.
///
/// Lines without a recognised symbology prefix continue the previous payload.
pub fn parse_zbar_output(stdout: &str) -> Vec<ScannedBarcode> {
    let mut parsed: Vec<(BarcodeFormat, String)> = Vec::new();

    for line in stdout.lines() {
        let header = line
            .split_once(':')
            .and_then(|(symbology, payload)| {
                format_from_symbology(symbology).map(|format| (format, payload))
            });

        match header {
            Some((format, payload)) => parsed.push((format, payload.to_string())),
            None => {
                if let Some((_, payload)) = parsed.last_mut() {
                    payload.push('\n');
                    payload.push_str(line);
                }
            }
        }
    }

    parsed
        .into_iter()
        .map(|(format, payload)| ScannedBarcode::from_raw(payload, format))
        .collect()
}

fn stderr_summary(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let summary = stderr.trim();
    if summary.is_empty() {
        format!("exit status {}", output.status)
    } else {
        summary.to_string()
    }
}

#[async_trait]
impl ImageDecoder for ZbarDecoder {
    async fn decode_image(
        &self,
        path: &Path,
        formats: &[BarcodeFormat],
    ) -> Result<Vec<ScannedBarcode>> {
        let mut args = vec!["--quiet".to_string()];

        if !formats.is_empty() {
            let names: Vec<&str> = formats.iter().filter_map(|f| zbar_config_name(*f)).collect();
            if names.is_empty() {
                tracing::warn!(
                    "[Zbar] None of the requested formats {:?} can be decoded by zbar",
                    formats
                );
                return Ok(Vec::new());
            }
            args.push("-Sdisable".to_string());
            args.extend(names.iter().map(|name| format!("-S{}.enable", name)));
        }

        args.push(path.to_string_lossy().to_string());

        let output = self.run(&self.zbarimg, &args).await?;

        if output.status.code() == Some(ZBARIMG_NOTHING_FOUND) {
            tracing::debug!("[Zbar] No barcode in {:?}", path);
            return Ok(Vec::new());
        }
        if !output.status.success() {
            return Err(ScanError::provider(
                "image decoder",
                stderr_summary(&output),
            ));
        }

        let barcodes: Vec<ScannedBarcode> = parse_zbar_output(&String::from_utf8_lossy(&output.stdout))
            .into_iter()
            .filter(|b| formats.is_empty() || formats.contains(&b.format))
            .collect();

        tracing::debug!("[Zbar] Decoded {} code(s) from {:?}", barcodes.len(), path);
        Ok(barcodes)
    }
}

#[async_trait]
impl LiveDecoder for ZbarDecoder {
    async fn scan(&self) -> Result<Vec<ScannedBarcode>> {
        let args = vec![
            "--quiet".to_string(),
            "--oneshot".to_string(),
            self.video_device.to_string_lossy().to_string(),
        ];

        let output = self.run(&self.zbarcam, &args).await?;

        if !output.status.success() {
            return Err(ScanError::provider("live decoder", stderr_summary(&output)));
        }

        Ok(parse_zbar_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[async_trait]
impl SupportProbe for ZbarDecoder {
    /// Supported when `zbarcam` runs and the video device exists.
    async fn is_supported(&self) -> Result<bool> {
        let device_present = tokio::fs::try_exists(&self.video_device)
            .await
            .unwrap_or(false);
        if !device_present {
            tracing::debug!("[Zbar] Video device {:?} not present", self.video_device);
            return Ok(false);
        }

        Ok(self.is_available(&self.zbarcam).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrscan_core::record::ValueType;

    #[test]
    fn test_parse_single_lines() {
        let barcodes = parse_zbar_output("QR-Code:https://example.com\nEAN-13:4006381333931\n");
        assert_eq!(barcodes.len(), 2);

        assert_eq!(barcodes[0].format, BarcodeFormat::QrCode);
        assert_eq!(barcodes[0].raw_value, "https://example.com");
        assert_eq!(barcodes[0].value_type, ValueType::Url);

        assert_eq!(barcodes[1].format, BarcodeFormat::Ean13);
        assert_eq!(barcodes[1].value_type, ValueType::Product);
    }

    #[test]
    fn test_parse_keeps_colons_in_payload() {
        let barcodes = parse_zbar_output("QR-Code:WIFI:S:home;T:WPA;P:pw;;\n");
        assert_eq!(barcodes.len(), 1);
        assert_eq!(barcodes[0].raw_value, "WIFI:S:home;T:WPA;P:pw;;");
        assert_eq!(barcodes[0].value_type, ValueType::Wifi);
    }

    #[test]
    fn test_parse_multiline_payload() {
        let stdout = "QR-Code:BEGIN:VCARD\nFN:Someone\nTEL:+4930123456\nEND:VCARD\nQR-Code:next\n";
        let barcodes = parse_zbar_output(stdout);
        assert_eq!(barcodes.len(), 2);
        assert_eq!(
            barcodes[0].raw_value,
            "BEGIN:VCARD\nFN:Someone\nTEL:+4930123456\nEND:VCARD"
        );
        assert_eq!(barcodes[0].value_type, ValueType::ContactInfo);
        assert_eq!(barcodes[1].raw_value, "next");
    }

    #[test]
    fn test_parse_ignores_leading_noise() {
        assert!(parse_zbar_output("scanned 0 barcode symbols\n").is_empty());
        assert!(parse_zbar_output("").is_empty());
    }

    #[test]
    fn test_config_names() {
        assert_eq!(zbar_config_name(BarcodeFormat::QrCode), Some("qrcode"));
        assert_eq!(zbar_config_name(BarcodeFormat::Itf), Some("i25"));
        assert_eq!(zbar_config_name(BarcodeFormat::Aztec), None);
    }

    #[tokio::test]
    async fn test_missing_executable_is_provider_error() {
        let decoder = ZbarDecoder::new(&DecoderConfig {
            zbarimg: "qrscan-test-no-such-zbarimg".to_string(),
            zbarcam: "qrscan-test-no-such-zbarcam".to_string(),
            video_device: PathBuf::from("/nonexistent/video-device"),
        });

        let err = decoder
            .decode_image(Path::new("/tmp/none.png"), &[BarcodeFormat::QrCode])
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::Provider { .. }));
        assert!(!decoder.is_supported().await.unwrap());
    }

    #[tokio::test]
    async fn test_unsupported_formats_decode_nothing() {
        let decoder = ZbarDecoder::new(&DecoderConfig::default());
        let barcodes = decoder
            .decode_image(Path::new("/tmp/none.png"), &[BarcodeFormat::Aztec])
            .await
            .unwrap();
        assert!(barcodes.is_empty());
    }
}
