//! Error handling for the signing core.
//!
//! Every failure is reported as a numbered [`ErrorCode`]. Codes are grouped
//! into families so that callers (and the conformance corpus) can match on
//! the number alone:
//!
//! | Range | Family                               |
//! |-------|--------------------------------------|
//! | 1xx   | Input syntax (hex, decimal, range)   |
//! | 2xx   | Value encoding                       |
//! | 3xx   | Type graph                           |
//! | 4xx   | Parameters                           |
//! | 5xx   | Signing                              |
//! | 6xx   | Configuration                        |
//! | 9xx   | Internal                             |
//!
//! Library code returns [`ErrorCode::E900_InternalError`] rather than panic.

use std::fmt;
use thiserror::Error;

/// All error codes produced by the signing core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    /// E100_InvalidHex (code 100)
    #[error("E100_InvalidHex({0})")]
    E100_InvalidHex(/* value */ String),

    /// E102_InvalidDecimal (code 102)
    #[error("E102_InvalidDecimal({0})")]
    E102_InvalidDecimal(/* value */ String),

    /// E103_ValueTooLarge (code 103)
    #[error("E103_ValueTooLarge({0})")]
    E103_ValueTooLarge(/* value */ String),

    /// E200_ShortStringTooLong (code 200)
    #[error("E200_ShortStringTooLong({0})")]
    E200_ShortStringTooLong(/* length */ u64),

    /// E201_NonAsciiShortString (code 201)
    #[error("E201_NonAsciiShortString({0})")]
    E201_NonAsciiShortString(/* value */ String),

    /// E202_MissingField (code 202)
    #[error("E202_MissingField({0}, {1})")]
    E202_MissingField(/* type */ String, /* field */ String),

    /// E203_UnexpectedValue (code 203)
    #[error("E203_UnexpectedValue({0}, {1})")]
    E203_UnexpectedValue(/* field */ String, /* reason */ String),

    /// E204_UnsupportedJsonValue (code 204)
    #[error("E204_UnsupportedJsonValue({0})")]
    E204_UnsupportedJsonValue(/* reason */ String),

    /// E205_MalformedTypeRef (code 205)
    #[error("E205_MalformedTypeRef({0})")]
    E205_MalformedTypeRef(/* value */ String),

    /// E206_InvalidJson (code 206)
    #[error("E206_InvalidJson({0})")]
    E206_InvalidJson(/* reason */ String),

    /// E300_UnknownType (code 300)
    #[error("E300_UnknownType({0})")]
    E300_UnknownType(/* type */ String),

    /// E301_DuplicateField (code 301)
    #[error("E301_DuplicateField({0}, {1})")]
    E301_DuplicateField(/* type */ String, /* field */ String),

    /// E302_NestingDepthExceeded (code 302)
    #[error("E302_NestingDepthExceeded({0})")]
    E302_NestingDepthExceeded(/* limit */ u64),

    /// E303_ArrayTooLong (code 303)
    #[error("E303_ArrayTooLong({0})")]
    E303_ArrayTooLong(/* limit */ u64),

    /// E304_TooManyTypes (code 304)
    #[error("E304_TooManyTypes({0})")]
    E304_TooManyTypes(/* limit */ u64),

    /// E305_TooManyFields (code 305)
    #[error("E305_TooManyFields({0}, {1})")]
    E305_TooManyFields(/* type */ String, /* limit */ u64),

    /// E306_ReservedTypeName (code 306)
    #[error("E306_ReservedTypeName({0})")]
    E306_ReservedTypeName(/* type */ String),

    /// E400_InvalidModulus (code 400)
    #[error("E400_InvalidModulus({0})")]
    E400_InvalidModulus(/* value */ String),

    /// E401_InvalidL1Signature (code 401)
    #[error("E401_InvalidL1Signature({0})")]
    E401_InvalidL1Signature(/* reason */ String),

    /// E402_InvalidPrivateKey (code 402)
    #[error("E402_InvalidPrivateKey")]
    E402_InvalidPrivateKey,

    /// E403_MessageHashOutOfRange (code 403)
    #[error("E403_MessageHashOutOfRange({0})")]
    E403_MessageHashOutOfRange(/* value */ String),

    /// E404_InvalidQuantity (code 404)
    #[error("E404_InvalidQuantity({0})")]
    E404_InvalidQuantity(/* value */ String),

    /// E405_InvalidNonce (code 405)
    #[error("E405_InvalidNonce({0})")]
    E405_InvalidNonce(/* value */ String),

    /// E500_SignatureDegenerate (code 500)
    #[error("E500_SignatureDegenerate({0})")]
    E500_SignatureDegenerate(/* count */ u64),

    /// E600_InvalidConfig (code 600)
    #[error("E600_InvalidConfig({0}, {1})")]
    E600_InvalidConfig(/* key */ String, /* reason */ String),

    /// E601_ConfigIo (code 601)
    #[error("E601_ConfigIo({0})")]
    E601_ConfigIo(/* reason */ String),

    /// E900_InternalError (code 900)
    #[error("E900_InternalError({0})")]
    E900_InternalError(/* reason */ String),
}

/// The coarse error kinds callers are expected to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A string or value cannot be represented as a field element.
    Encoding,
    /// A field references a struct type that was never declared.
    UnknownType,
    /// Malformed hex, a bad modulus, a key or hash out of range.
    InvalidParameter,
    /// Signing kept producing degenerate signatures.
    SignatureDegenerate,
    /// Configuration could not be loaded or validated.
    Config,
    /// A bug in this crate.
    Internal,
}

impl ErrorKind {
    /// Name of the kind as used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Encoding => "EncodingError",
            ErrorKind::UnknownType => "UnknownTypeError",
            ErrorKind::InvalidParameter => "InvalidParameterError",
            ErrorKind::SignatureDegenerate => "SignatureDegenerateError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::E100_InvalidHex(_) => 100,
            ErrorCode::E102_InvalidDecimal(_) => 102,
            ErrorCode::E103_ValueTooLarge(_) => 103,
            ErrorCode::E200_ShortStringTooLong(_) => 200,
            ErrorCode::E201_NonAsciiShortString(_) => 201,
            ErrorCode::E202_MissingField(_, _) => 202,
            ErrorCode::E203_UnexpectedValue(_, _) => 203,
            ErrorCode::E204_UnsupportedJsonValue(_) => 204,
            ErrorCode::E205_MalformedTypeRef(_) => 205,
            ErrorCode::E206_InvalidJson(_) => 206,
            ErrorCode::E300_UnknownType(_) => 300,
            ErrorCode::E301_DuplicateField(_, _) => 301,
            ErrorCode::E302_NestingDepthExceeded(_) => 302,
            ErrorCode::E303_ArrayTooLong(_) => 303,
            ErrorCode::E304_TooManyTypes(_) => 304,
            ErrorCode::E305_TooManyFields(_, _) => 305,
            ErrorCode::E306_ReservedTypeName(_) => 306,
            ErrorCode::E400_InvalidModulus(_) => 400,
            ErrorCode::E401_InvalidL1Signature(_) => 401,
            ErrorCode::E402_InvalidPrivateKey => 402,
            ErrorCode::E403_MessageHashOutOfRange(_) => 403,
            ErrorCode::E404_InvalidQuantity(_) => 404,
            ErrorCode::E405_InvalidNonce(_) => 405,
            ErrorCode::E500_SignatureDegenerate(_) => 500,
            ErrorCode::E600_InvalidConfig(_, _) => 600,
            ErrorCode::E601_ConfigIo(_) => 601,
            ErrorCode::E900_InternalError(_) => 900,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E100_InvalidHex(_) => "E100_InvalidHex",
            ErrorCode::E102_InvalidDecimal(_) => "E102_InvalidDecimal",
            ErrorCode::E103_ValueTooLarge(_) => "E103_ValueTooLarge",
            ErrorCode::E200_ShortStringTooLong(_) => "E200_ShortStringTooLong",
            ErrorCode::E201_NonAsciiShortString(_) => "E201_NonAsciiShortString",
            ErrorCode::E202_MissingField(_, _) => "E202_MissingField",
            ErrorCode::E203_UnexpectedValue(_, _) => "E203_UnexpectedValue",
            ErrorCode::E204_UnsupportedJsonValue(_) => "E204_UnsupportedJsonValue",
            ErrorCode::E205_MalformedTypeRef(_) => "E205_MalformedTypeRef",
            ErrorCode::E206_InvalidJson(_) => "E206_InvalidJson",
            ErrorCode::E300_UnknownType(_) => "E300_UnknownType",
            ErrorCode::E301_DuplicateField(_, _) => "E301_DuplicateField",
            ErrorCode::E302_NestingDepthExceeded(_) => "E302_NestingDepthExceeded",
            ErrorCode::E303_ArrayTooLong(_) => "E303_ArrayTooLong",
            ErrorCode::E304_TooManyTypes(_) => "E304_TooManyTypes",
            ErrorCode::E305_TooManyFields(_, _) => "E305_TooManyFields",
            ErrorCode::E306_ReservedTypeName(_) => "E306_ReservedTypeName",
            ErrorCode::E400_InvalidModulus(_) => "E400_InvalidModulus",
            ErrorCode::E401_InvalidL1Signature(_) => "E401_InvalidL1Signature",
            ErrorCode::E402_InvalidPrivateKey => "E402_InvalidPrivateKey",
            ErrorCode::E403_MessageHashOutOfRange(_) => "E403_MessageHashOutOfRange",
            ErrorCode::E404_InvalidQuantity(_) => "E404_InvalidQuantity",
            ErrorCode::E405_InvalidNonce(_) => "E405_InvalidNonce",
            ErrorCode::E500_SignatureDegenerate(_) => "E500_SignatureDegenerate",
            ErrorCode::E600_InvalidConfig(_, _) => "E600_InvalidConfig",
            ErrorCode::E601_ConfigIo(_) => "E601_ConfigIo",
            ErrorCode::E900_InternalError(_) => "E900_InternalError",
        }
    }

    /// Map the code onto its coarse kind.
    pub fn kind(&self) -> ErrorKind {
        match self.code() {
            100..=103 => ErrorKind::InvalidParameter,
            200..=206 => ErrorKind::Encoding,
            300 => ErrorKind::UnknownType,
            // Malformed or oversized declarations are encoding failures.
            301..=306 => ErrorKind::Encoding,
            400..=405 => ErrorKind::InvalidParameter,
            500 => ErrorKind::SignatureDegenerate,
            600..=601 => ErrorKind::Config,
            _ => ErrorKind::Internal,
        }
    }
}

/// Result type for signing-core operations.
pub type SignerResult<T> = Result<T, ErrorCode>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_names_agree() {
        let samples = [
            ErrorCode::E100_InvalidHex("zz".into()),
            ErrorCode::E202_MissingField("Mail".into(), "to".into()),
            ErrorCode::E300_UnknownType("Person".into()),
            ErrorCode::E402_InvalidPrivateKey,
            ErrorCode::E500_SignatureDegenerate(16),
            ErrorCode::E600_InvalidConfig("nonce".into(), "bad".into()),
        ];
        for err in samples {
            assert!(err.name().starts_with(&format!("E{}_", err.code())));
            assert!(err.to_string().starts_with(err.name()));
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            ErrorCode::E200_ShortStringTooLong(32).kind(),
            ErrorKind::Encoding
        );
        assert_eq!(
            ErrorCode::E300_UnknownType("X".into()).kind(),
            ErrorKind::UnknownType
        );
        assert_eq!(
            ErrorCode::E400_InvalidModulus("1".into()).kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(ErrorKind::UnknownType.to_string(), "UnknownTypeError");
    }
}
