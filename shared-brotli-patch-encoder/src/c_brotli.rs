use crate::encode_error::EncodeError;
use brotlic_sys::{
    BrotliEncoderAttachPreparedDictionary, BrotliEncoderCompressStream,
    BrotliEncoderCreateInstance, BrotliEncoderDestroyInstance,
    BrotliEncoderDestroyPreparedDictionary, BrotliEncoderIsFinished,
    BrotliEncoderOperation_BROTLI_OPERATION_FINISH,
    BrotliEncoderParameter_BROTLI_PARAM_LGWIN, BrotliEncoderParameter_BROTLI_PARAM_QUALITY,
    BrotliEncoderPrepareDictionary, BrotliEncoderSetParameter,
    BrotliSharedDictionaryType_BROTLI_SHARED_DICTIONARY_RAW, BROTLI_FALSE,
};
use core::ptr;

/// Default quality used for shared dictionary diffs.
///
/// Matches the quality level used by the reference differ implementation.
const DEFAULT_QUALITY: i32 = 9;
const DEFAULT_LGWIN: i32 = 24;

pub fn shared_brotli_encode_c(
    uncompressed: &[u8],
    shared_dictionary: Option<&[u8]>,
) -> Result<Vec<u8>, EncodeError> {
    let dictionary = match shared_dictionary {
        Some(dict) if !dict.is_empty() => {
            let prepared = unsafe {
                BrotliEncoderPrepareDictionary(
                    BrotliSharedDictionaryType_BROTLI_SHARED_DICTIONARY_RAW,
                    dict.len(),
                    dict.as_ptr(),
                    DEFAULT_QUALITY,
                    None,
                    None,
                    ptr::null_mut(),
                )
            };
            if prepared.is_null() {
                return Err(EncodeError::InvalidDictionary);
            }
            Some(prepared)
        }
        _ => None,
    };

    let result = encode_with_prepared_dictionary(uncompressed, dictionary);

    if let Some(prepared) = dictionary {
        unsafe {
            BrotliEncoderDestroyPreparedDictionary(prepared);
        }
    }

    result
}

fn encode_with_prepared_dictionary(
    uncompressed: &[u8],
    dictionary: Option<*const brotlic_sys::BrotliEncoderPreparedDictionary>,
) -> Result<Vec<u8>, EncodeError> {
    let encoder = unsafe { BrotliEncoderCreateInstance(None, None, ptr::null_mut()) };
    if encoder.is_null() {
        return Err(EncodeError::InitFailure);
    }

    unsafe {
        BrotliEncoderSetParameter(
            encoder,
            BrotliEncoderParameter_BROTLI_PARAM_QUALITY,
            DEFAULT_QUALITY as u32,
        );
        BrotliEncoderSetParameter(
            encoder,
            BrotliEncoderParameter_BROTLI_PARAM_LGWIN,
            DEFAULT_LGWIN as u32,
        );
    }

    if let Some(prepared) = dictionary {
        if unsafe { BrotliEncoderAttachPreparedDictionary(encoder, prepared) } == BROTLI_FALSE {
            unsafe {
                BrotliEncoderDestroyInstance(encoder);
            }
            return Err(EncodeError::InvalidDictionary);
        }
    }

    // Brotli output is never larger than a small constant factor over the input for
    // our use case (shared dictionary diffs of closely related fonts), start with a
    // generous buffer and grow if needed.
    let mut sink: Vec<u8> = Vec::with_capacity(uncompressed.len() + 1024);
    let mut scratch = vec![0u8; 1 << 16];

    let mut next_in = uncompressed.as_ptr();
    let mut available_in = uncompressed.len();

    loop {
        let mut next_out = scratch.as_mut_ptr();
        let mut available_out = scratch.len();

        let ok = unsafe {
            BrotliEncoderCompressStream(
                encoder,
                BrotliEncoderOperation_BROTLI_OPERATION_FINISH,
                &mut available_in,
                &mut next_in,
                &mut available_out,
                &mut next_out,
                ptr::null_mut(),
            )
        };

        if ok == BROTLI_FALSE {
            unsafe {
                BrotliEncoderDestroyInstance(encoder);
            }
            return Err(EncodeError::EncodingFailed);
        }

        let produced = scratch.len() - available_out;
        sink.extend_from_slice(&scratch[..produced]);

        if unsafe { BrotliEncoderIsFinished(encoder) } != BROTLI_FALSE {
            break;
        }
    }

    unsafe {
        BrotliEncoderDestroyInstance(encoder);
    }

    Ok(sink)
}
