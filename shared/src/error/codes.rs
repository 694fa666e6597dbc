//! Unified error codes for the grocery storefront
//!
//! This module defines all error codes used across the server, admin
//! dashboard, and storefront clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Promo code errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors
//! - 7xxx: Time slot errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Promo ====================
    /// Promo code not found or inactive
    PromoNotFound = 3001,
    /// Promo code is not yet active
    PromoNotYetActive = 3002,
    /// Promo code has expired
    PromoExpired = 3003,
    /// Promo code usage limit reached
    PromoLimitReached = 3004,
    /// Order subtotal below the promo minimum
    PromoMinimumNotMet = 3005,
    /// Promo code already exists
    PromoCodeExists = 3006,
    /// Promo discount value is invalid
    PromoInvalidValue = 3007,
    /// Promo validity window is invalid (valid_until before valid_from)
    PromoInvalidWindow = 3008,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Illegal order status transition
    OrderInvalidTransition = 4003,
    /// Order is not in a deletable state
    OrderNotTerminal = 4004,
    /// Pickup order not found
    PickupOrderNotFound = 4101,
    /// Grocery run has no stores selected
    RunStoresEmpty = 4102,
    /// Grocery run estimated total below the minimum floor
    RunMinimumNotMet = 4103,
    /// Store entry not found on this grocery run
    RunStoreEntryNotFound = 4104,

    // ==================== 5xxx: Payment ====================
    /// Illegal payment status transition
    PaymentInvalidTransition = 5001,
    /// Payment has already been confirmed
    PaymentAlreadyConfirmed = 5002,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has products
    CategoryHasProducts = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,
    /// Store not found
    StoreNotFound = 6201,
    /// Store is referenced by grocery runs
    StoreHasOrders = 6202,
    /// Store name already exists
    StoreNameExists = 6203,
    /// Store is not active
    StoreInactive = 6204,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Invalid file extension
    InvalidFileExtension = 6507,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 7xxx: Time Slot ====================
    /// Time slot not found
    SlotNotFound = 7001,
    /// Time slot is fully booked
    SlotFull = 7002,
    /// Time slot is not active
    SlotInactive = 7003,
    /// Time slot date is in the past
    SlotDateInPast = 7004,
    /// Time slot is referenced by orders
    SlotHasOrders = 7005,
    /// Slot end time is not after start time
    SlotInvalidTimeRange = 7006,
    /// Slot type does not match the order type
    SlotWrongType = 7007,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Configured timezone is not a valid IANA zone
    InvalidTimezone = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Promo
            ErrorCode::PromoNotFound => "Invalid promo code",
            ErrorCode::PromoNotYetActive => "This promo code is not active yet",
            ErrorCode::PromoExpired => "This promo code has expired",
            ErrorCode::PromoLimitReached => "This promo code has reached its usage limit",
            ErrorCode::PromoMinimumNotMet => "Order total does not meet the promo minimum",
            ErrorCode::PromoCodeExists => "Promo code already exists",
            ErrorCode::PromoInvalidValue => "Promo discount value is invalid",
            ErrorCode::PromoInvalidWindow => "Promo validity window is invalid",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderInvalidTransition => "Illegal order status transition",
            ErrorCode::OrderNotTerminal => "Order must be delivered, completed or cancelled first",
            ErrorCode::PickupOrderNotFound => "Pickup order not found",
            ErrorCode::RunStoresEmpty => "Select at least one store for a grocery run",
            ErrorCode::RunMinimumNotMet => "Grocery run is below the minimum estimated total",
            ErrorCode::RunStoreEntryNotFound => "Store entry not found on this grocery run",

            // Payment
            ErrorCode::PaymentInvalidTransition => "Illegal payment status transition",
            ErrorCode::PaymentAlreadyConfirmed => "Payment has already been confirmed",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasProducts => "Category has associated products",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::StoreHasOrders => "Store is referenced by grocery runs",
            ErrorCode::StoreNameExists => "Store name already exists",
            ErrorCode::StoreInactive => "Store is not active",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Time Slot
            ErrorCode::SlotNotFound => "Time slot not found",
            ErrorCode::SlotFull => "This time slot is fully booked",
            ErrorCode::SlotInactive => "This time slot is no longer available",
            ErrorCode::SlotDateInPast => "This time slot date has already passed",
            ErrorCode::SlotHasOrders => "Time slot is referenced by orders",
            ErrorCode::SlotInvalidTimeRange => "End time must be after start time",
            ErrorCode::SlotWrongType => "Time slot type does not match the order type",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::InvalidTimezone => "Configured timezone is not a valid IANA zone",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Promo
            3001 => Ok(ErrorCode::PromoNotFound),
            3002 => Ok(ErrorCode::PromoNotYetActive),
            3003 => Ok(ErrorCode::PromoExpired),
            3004 => Ok(ErrorCode::PromoLimitReached),
            3005 => Ok(ErrorCode::PromoMinimumNotMet),
            3006 => Ok(ErrorCode::PromoCodeExists),
            3007 => Ok(ErrorCode::PromoInvalidValue),
            3008 => Ok(ErrorCode::PromoInvalidWindow),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderInvalidTransition),
            4004 => Ok(ErrorCode::OrderNotTerminal),
            4101 => Ok(ErrorCode::PickupOrderNotFound),
            4102 => Ok(ErrorCode::RunStoresEmpty),
            4103 => Ok(ErrorCode::RunMinimumNotMet),
            4104 => Ok(ErrorCode::RunStoreEntryNotFound),

            // Payment
            5001 => Ok(ErrorCode::PaymentInvalidTransition),
            5002 => Ok(ErrorCode::PaymentAlreadyConfirmed),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasProducts),
            6103 => Ok(ErrorCode::CategoryNameExists),
            6201 => Ok(ErrorCode::StoreNotFound),
            6202 => Ok(ErrorCode::StoreHasOrders),
            6203 => Ok(ErrorCode::StoreNameExists),
            6204 => Ok(ErrorCode::StoreInactive),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6507 => Ok(ErrorCode::InvalidFileExtension),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // Time Slot
            7001 => Ok(ErrorCode::SlotNotFound),
            7002 => Ok(ErrorCode::SlotFull),
            7003 => Ok(ErrorCode::SlotInactive),
            7004 => Ok(ErrorCode::SlotDateInPast),
            7005 => Ok(ErrorCode::SlotHasOrders),
            7006 => Ok(ErrorCode::SlotInvalidTimeRange),
            7007 => Ok(ErrorCode::SlotWrongType),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::InvalidTimezone),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);
        assert_eq!(ErrorCode::InvalidRequest.code(), 5);
        assert_eq!(ErrorCode::InvalidFormat.code(), 6);
        assert_eq!(ErrorCode::RequiredField.code(), 7);
        assert_eq!(ErrorCode::ValueOutOfRange.code(), 8);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);
        assert_eq!(ErrorCode::TokenInvalid.code(), 1004);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);

        // Promo
        assert_eq!(ErrorCode::PromoNotFound.code(), 3001);
        assert_eq!(ErrorCode::PromoNotYetActive.code(), 3002);
        assert_eq!(ErrorCode::PromoExpired.code(), 3003);
        assert_eq!(ErrorCode::PromoLimitReached.code(), 3004);
        assert_eq!(ErrorCode::PromoMinimumNotMet.code(), 3005);
        assert_eq!(ErrorCode::PromoCodeExists.code(), 3006);
        assert_eq!(ErrorCode::PromoInvalidValue.code(), 3007);
        assert_eq!(ErrorCode::PromoInvalidWindow.code(), 3008);

        // Order
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderEmpty.code(), 4002);
        assert_eq!(ErrorCode::OrderInvalidTransition.code(), 4003);
        assert_eq!(ErrorCode::OrderNotTerminal.code(), 4004);
        assert_eq!(ErrorCode::PickupOrderNotFound.code(), 4101);
        assert_eq!(ErrorCode::RunStoresEmpty.code(), 4102);
        assert_eq!(ErrorCode::RunMinimumNotMet.code(), 4103);
        assert_eq!(ErrorCode::RunStoreEntryNotFound.code(), 4104);

        // Payment
        assert_eq!(ErrorCode::PaymentInvalidTransition.code(), 5001);
        assert_eq!(ErrorCode::PaymentAlreadyConfirmed.code(), 5002);

        // Catalog
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::ProductInvalidPrice.code(), 6002);
        assert_eq!(ErrorCode::CategoryNotFound.code(), 6101);
        assert_eq!(ErrorCode::CategoryHasProducts.code(), 6102);
        assert_eq!(ErrorCode::CategoryNameExists.code(), 6103);
        assert_eq!(ErrorCode::StoreNotFound.code(), 6201);
        assert_eq!(ErrorCode::StoreHasOrders.code(), 6202);
        assert_eq!(ErrorCode::StoreNameExists.code(), 6203);
        assert_eq!(ErrorCode::StoreInactive.code(), 6204);

        // Time Slot
        assert_eq!(ErrorCode::SlotNotFound.code(), 7001);
        assert_eq!(ErrorCode::SlotFull.code(), 7002);
        assert_eq!(ErrorCode::SlotInactive.code(), 7003);
        assert_eq!(ErrorCode::SlotDateInPast.code(), 7004);
        assert_eq!(ErrorCode::SlotHasOrders.code(), 7005);
        assert_eq!(ErrorCode::SlotInvalidTimeRange.code(), 7006);
        assert_eq!(ErrorCode::SlotWrongType.code(), 7007);

        // User
        assert_eq!(ErrorCode::UserNotFound.code(), 8001);
        assert_eq!(ErrorCode::UsernameExists.code(), 8002);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::NetworkError.code(), 9003);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
        assert_eq!(ErrorCode::InvalidTimezone.code(), 9006);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(3001), Ok(ErrorCode::PromoNotFound));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::OrderNotFound));
        assert_eq!(ErrorCode::try_from(7002), Ok(ErrorCode::SlotFull));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_from_error_code_to_u16() {
        let code: u16 = ErrorCode::Success.into();
        assert_eq!(code, 0);

        let code: u16 = ErrorCode::NotAuthenticated.into();
        assert_eq!(code, 1001);

        let code: u16 = ErrorCode::SlotFull.into();
        assert_eq!(code, 7002);
    }

    #[test]
    fn test_serialize() {
        let code = ErrorCode::NotFound;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "3");

        let code = ErrorCode::PromoExpired;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "3003");

        let code = ErrorCode::Success;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("0").unwrap();
        assert_eq!(code, ErrorCode::Success);

        let code: ErrorCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, ErrorCode::NotFound);

        let code: ErrorCode = serde_json::from_str("3004").unwrap();
        assert_eq!(code, ErrorCode::PromoLimitReached);

        let code: ErrorCode = serde_json::from_str("9001").unwrap();
        assert_eq!(code, ErrorCode::InternalError);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::NotFound), "3");
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "4001");
        assert_eq!(format!("{}", ErrorCode::InternalError), "9001");
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::Success.message(),
            "Operation completed successfully"
        );
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::PromoNotFound.message(), "Invalid promo code");
        assert_eq!(
            ErrorCode::SlotFull.message(),
            "This time slot is fully booked"
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }

    #[test]
    fn test_roundtrip() {
        // Test that serialization -> deserialization roundtrip works
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PromoMinimumNotMet,
            ErrorCode::SlotDateInPast,
            ErrorCode::OrderNotFound,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_debug() {
        // Test that Debug derive works correctly
        let debug_str = format!("{:?}", ErrorCode::Success);
        assert_eq!(debug_str, "Success");

        let debug_str = format!("{:?}", ErrorCode::SlotFull);
        assert_eq!(debug_str, "SlotFull");
    }

    #[test]
    fn test_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ErrorCode::Success);
        set.insert(ErrorCode::NotFound);
        set.insert(ErrorCode::Success); // Duplicate

        assert_eq!(set.len(), 2);
        assert!(set.contains(&ErrorCode::Success));
        assert!(set.contains(&ErrorCode::NotFound));
    }
}
