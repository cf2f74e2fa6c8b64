//! services/api/src/adapters/barcode.rs
//!
//! The barcode decoder adapter, a concrete implementation of the
//! `BarcodeDecoder` port on top of the `rxing` recognition engine. One
//! call is one single-shot decode pass over one captured camera frame,
//! restricted to the retail symbologies a book barcode can carry.

use std::collections::{HashMap, HashSet};

use bookscan_core::domain::{DecodedSymbol, SymbolFormat};
use bookscan_core::ports::{BarcodeDecoder, PortError, PortResult};
use rxing::{BarcodeFormat, DecodeHintType, DecodeHintValue, DecodingHintDictionary, Exceptions};

/// A decoder adapter that implements the `BarcodeDecoder` port.
#[derive(Default, Clone)]
pub struct RxingDecoderAdapter;

impl RxingDecoderAdapter {
    pub fn new() -> Self {
        Self
    }

    fn hints() -> DecodingHintDictionary {
        HashMap::from([
            (
                DecodeHintType::POSSIBLE_FORMATS,
                DecodeHintValue::PossibleFormats(HashSet::from([
                    BarcodeFormat::EAN_13,
                    BarcodeFormat::EAN_8,
                    BarcodeFormat::UPC_A,
                    BarcodeFormat::UPC_E,
                ])),
            ),
            // Symbol-location search: the barcode is somewhere in a noisy
            // camera frame, not centered in a clean scan.
            (DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true)),
        ])
    }
}

impl BarcodeDecoder for RxingDecoderAdapter {
    fn decode_frame(&self, frame: &[u8]) -> PortResult<Vec<DecodedSymbol>> {
        let image = image::load_from_memory(frame)
            .map_err(|e| PortError::Unexpected(format!("unreadable frame image: {e}")))?;
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();

        let mut hints = Self::hints();
        match rxing::helpers::detect_in_luma_with_hints(
            luma.into_raw(),
            height,
            width,
            None,
            &mut hints,
        ) {
            Ok(result) => {
                let format = match result.getBarcodeFormat() {
                    BarcodeFormat::EAN_13 => SymbolFormat::Ean13,
                    BarcodeFormat::EAN_8 => SymbolFormat::Ean8,
                    BarcodeFormat::UPC_A => SymbolFormat::UpcA,
                    BarcodeFormat::UPC_E => SymbolFormat::UpcE,
                    // The hints exclude everything else; treat a stray
                    // format as no detection.
                    _ => return Ok(vec![]),
                };
                Ok(vec![DecodedSymbol {
                    format,
                    text: result.getText().to_string(),
                }])
            }
            // "No symbol in this frame" is an empty result, not a failure.
            Err(Exceptions::NotFoundException(_)) => Ok(vec![]),
            Err(e) => Err(PortError::Unexpected(format!("decode engine error: {e}"))),
        }
    }
}
