//! Canonical error taxonomy.
//!
//! Every processor integration maps its vendor codes onto this closed set
//! (see [`crate::domain::ErrorCodeTable`]). Each kind carries a wire name, the
//! remediation the operator should be offered and a short description. The
//! table below is data; the `canonical_errors!` macro turns it into the enum
//! and its lookups.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// What the operator can do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remediation {
    /// Transient; retrying the same item is likely to work.
    Retry,
    /// The card/payment instrument was refused.
    UseAnotherCard,
    /// Needs someone with access to the acquirer or backend.
    ContactSupport,
    /// Device, reader or configuration needs attention first.
    CheckSetup,
    /// Informational; nothing specific to suggest.
    NoAction,
}

impl Remediation {
    /// Retrying without changing anything is a sensible default.
    pub fn is_retryable(self) -> bool {
        matches!(self, Remediation::Retry)
    }
}

macro_rules! canonical_errors {
    ($( $variant:ident => $name:literal, $hint:ident, $desc:literal; )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ProcessingErrorEvent {
            $(
                #[doc = $desc]
                $variant,
            )+
        }

        impl ProcessingErrorEvent {
            /// Every kind, in declaration order.
            pub const ALL: &'static [ProcessingErrorEvent] = &[
                $( ProcessingErrorEvent::$variant, )+
            ];

            /// Stable wire name (SCREAMING_SNAKE_CASE).
            pub fn as_str(self) -> &'static str {
                match self {
                    $( ProcessingErrorEvent::$variant => $name, )+
                }
            }

            pub fn description(self) -> &'static str {
                match self {
                    $( ProcessingErrorEvent::$variant => $desc, )+
                }
            }

            pub fn remediation(self) -> Remediation {
                match self {
                    $( ProcessingErrorEvent::$variant => Remediation::$hint, )+
                }
            }

            /// Exact lookup by wire name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(ProcessingErrorEvent::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

impl ProcessingErrorEvent {
    /// Lenient lookup for free-form messages: trims, uppercases and falls
    /// back to `Generic`. Never fails.
    pub fn from_message(message: &str) -> Self {
        let normalized = message.trim().to_ascii_uppercase();
        Self::from_name(&normalized).unwrap_or(ProcessingErrorEvent::Generic)
    }
}

impl fmt::Display for ProcessingErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error kind: {0}")]
pub struct UnknownErrorKind(pub String);

impl FromStr for ProcessingErrorEvent {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownErrorKind(s.to_string()))
    }
}

impl Serialize for ProcessingErrorEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProcessingErrorEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

canonical_errors! {
    ProductQuantityOverflow => "PRODUCT_QUANTITY_OVERFLOW", NoAction, "Product quantity overflow";
    NfcTagNotFound => "NFC_TAG_NOT_FOUND", NoAction, "NFC tag not found";
    NfcReadingTagCustomerDataError => "NFC_READING_TAG_CUSTOMER_DATA_ERROR", NoAction, "Error reading NFC tag customer data";
    NfcProcessingTagCustomerDataError => "NFC_PROCESSING_TAG_CUSTOMER_DATA_ERROR", NoAction, "Error processing NFC tag customer data";
    NfcTagCustomerPinIncorrect => "NFC_TAG_CUSTOMER_PIN_INCORRECT", NoAction, "NFC tag customer PIN incorrect";
    InvalidPixKey => "INVALID_PIX_KEY", NoAction, "Merchant invalid PIX key";
    NfcTagInvalidKeys => "NFC_TAG_INVALID_KEYS", NoAction, "NFC tag invalid keys";
    NfcTagMissingKeys => "NFC_TAG_MISSING_KEYS", NoAction, "NFC missing keys";
    NfcTagInvalidKeyLength => "NFC_TAG_INVALID_KEY_LENGTH", CheckSetup, "NFC tag invalid key length";
    NfcWriteError => "NFC_WRITE_ERROR", Retry, "NFC write error";
    NfcReadError => "NFC_READ_ERROR", NoAction, "NFC read error";
    NfcTagInvalidKeyFormat => "NFC_TAG_INVALID_KEY_FORMAT", NoAction, "NFC tag invalid key format";
    ProcessorNotFound => "PROCESSOR_NOT_FOUND", NoAction, "Processor not found";
    RefundError => "REFUND_ERROR", Retry, "Error refunding transaction";
    GenericRetry => "GENERIC_RETRY", Retry, "Generic retry error";
    InvalidTransactionBuffer => "INVALID_TRANSACTION_BUFFER", CheckSetup, "Invalid transaction response buffer";
    InvalidFile => "INVALID_FILE", Retry, "Invalid file";
    UnexpectedError => "UNEXPECTED_ERROR", Retry, "Unexpected error";
    AttemptsExceeded => "ATTEMPTS_EXCEEDED", UseAnotherCard, "Attempts exceeded";
    InstallmentNotAllowed => "INSTALLMENT_NOT_ALLOWED", UseAnotherCard, "Installment not allowed for this transaction type";
    InstallmentNotAllowedPrepaid => "INSTALLMENT_NOT_ALLOWED_PREPAID", NoAction, "Installment not allowed for prepaid card";
    InvalidInstallmentMethod => "INVALID_INSTALLMENT_METHOD", CheckSetup, "Invalid installment method";
    OperationNotPerformed => "OPERATION_NOT_PERFORMED", NoAction, "Operation not performed";
    UseCreditForPreauth => "USE_CREDIT_FOR_PREAUTH", NoAction, "Use credit function to perform pre-authorization";
    CaptureAmountExceeded => "CAPTURE_AMOUNT_EXCEEDED", NoAction, "Capture amount is greater than pre-authorized amount";
    BrandNotAllowedPreauth => "BRAND_NOT_ALLOWED_PREAUTH", NoAction, "Card brand not allowed for pre-authorization";
    PreauthExpired => "PREAUTH_EXPIRED", NoAction, "Pre-authorization cannot be captured";
    PreauthNotEnabled => "PREAUTH_NOT_ENABLED", ContactSupport, "Pre-authorization not enabled";
    CardNotIdentified => "CARD_NOT_IDENTIFIED", UseAnotherCard, "Card not identified";
    OperationTimeout => "OPERATION_TIMEOUT", Retry, "Operation timeout exceeded";
    InvalidCardData => "INVALID_CARD_DATA", NoAction, "Invalid card data";
    MinimumInstallmentAmount => "MINIMUM_INSTALLMENT_AMOUNT", NoAction, "Minimum installment amount is $5.00";
    AmountTooLow => "AMOUNT_TOO_LOW", NoAction, "Amount lower than allowed";
    InvalidTransactionAmount => "INVALID_TRANSACTION_AMOUNT", NoAction, "Invalid transaction amount";
    PreauthQuantityExceeded => "PREAUTH_QUANTITY_EXCEEDED", NoAction, "Pre-authorization quantity exceeded";
    RequestInProgress => "REQUEST_IN_PROGRESS", NoAction, "Operation not allowed";
    RequestCannotBeCompleted => "REQUEST_CANNOT_BE_COMPLETED", ContactSupport, "Request cannot be completed";
    RequestCannotBeExecuted => "REQUEST_CANNOT_BE_EXECUTED", ContactSupport, "Request cannot be executed";
    IncorrectActivationCode => "INCORRECT_ACTIVATION_CODE", Retry, "Incorrect code";
    OperationTimeExceeded => "OPERATION_TIME_EXCEEDED", NoAction, "Operation time exceeded";
    InvalidPosKey => "INVALID_POS_KEY", ContactSupport, "Invalid POS key";
    UpdateDevice => "UPDATE_DEVICE", CheckSetup, "To continue selling update your device";
    TransactionCannotBeReversed => "TRANSACTION_CANNOT_BE_REVERSED", NoAction, "Transaction cannot be reversed";
    TransactionCannotBeConfirmed => "TRANSACTION_CANNOT_BE_CONFIRMED", ContactSupport, "Transaction cannot be confirmed";
    TransactionAlreadyReversed => "TRANSACTION_ALREADY_REVERSED", NoAction, "Transaction already reversed";
    TransactionNotAuthorized => "TRANSACTION_NOT_AUTHORIZED", NoAction, "Transaction not authorized";
    TransactionNotAuthorizedContactManager => "TRANSACTION_NOT_AUTHORIZED_CONTACT_MANAGER", ContactSupport, "Transaction not authorized by acquirer";
    CommunicationError => "COMMUNICATION_ERROR", Retry, "Communication problem try again";
    OperationCancelled => "OPERATION_CANCELLED", Retry, "Operation cancelled";
    CardErrorPoorlyInserted => "CARD_ERROR_POORLY_INSERTED", UseAnotherCard, "Card with error or poorly inserted";
    InvalidCardNotAccepted => "INVALID_CARD_NOT_ACCEPTED", UseAnotherCard, "Invalid card";
    InvalidCardUseAnother => "INVALID_CARD_USE_ANOTHER", UseAnotherCard, "Invalid card";
    TransactionNotAuthorizedByAcquirer => "TRANSACTION_NOT_AUTHORIZED_BY_ACQUIRER", ContactSupport, "Not authorized by acquirer";
    TransactionNotAuthorizedByIssuer => "TRANSACTION_NOT_AUTHORIZED_BY_ISSUER", ContactSupport, "Transaction not authorized by issuer";
    InvalidCard => "INVALID_CARD", CheckSetup, "Invalid card reader";
    PrintFileNotFound => "PRINT_FILE_NOT_FOUND", Retry, "Print file not found";
    InvalidBin => "INVALID_BIN", UseAnotherCard, "Invalid bin";
    InvalidHolder => "INVALID_HOLDER", UseAnotherCard, "Invalid holder";
    InvalidCardNumber => "INVALID_CARD_NUMBER", UseAnotherCard, "Invalid card number";
    InvalidReaderSerialNumber => "INVALID_READER_SERIAL_NUMBER", NoAction, "Reader serial number is invalid";
    UnidentifiedReaderSerialNumber => "UNIDENTIFIED_READER_SERIAL_NUMBER", ContactSupport, "Reader serial number not identified";
    InactiveReader => "INACTIVE_READER", CheckSetup, "Inactive reader";
    ConnectionRefused => "CONNECTION_REFUSED", NoAction, "Connection refused";
    TransactionNotFound => "TRANSACTION_NOT_FOUND", NoAction, "Transaction not found for refund";
    InvalidInputMode => "INVALID_INPUT_MODE", NoAction, "Invalid input mode";
    ReaderWithoutKey => "READER_WITHOUT_KEY", NoAction, "Reader without required key";
    PrinterBusy => "PRINTER_BUSY", Retry, "Printer busy";
    WifiNetworksNotFound => "WIFI_NETWORKS_NOT_FOUND", NoAction, "WiFi networks not found";
    WifiAuthError => "WIFI_AUTH_ERROR", Retry, "WiFi authentication error";
    FileOperationFailure => "FILE_OPERATION_FAILURE", Retry, "File operation failure";
    CancelledByUser => "CANCELLED_BY_USER", NoAction, "User canceled operation";
    InvalidMenuOption => "INVALID_MENU_OPTION", NoAction, "Invalid menu option";
    AcquirerServerError => "ACQUIRER_SERVER_ERROR", Retry, "Server operation failure";
    CommunicationTimeout => "COMMUNICATION_TIMEOUT", Retry, "Communication timeout";
    ContactlessNotAuthorized => "CONTACTLESS_NOT_AUTHORIZED", ContactSupport, "Contactless not authorized insert card";
    InvalidSelectedOption => "INVALID_SELECTED_OPTION", ContactSupport, "Invalid selected option";
    CardReachNotAllowed => "CARD_REACH_NOT_ALLOWED", ContactSupport, "Card reach not allowed";
    NfcTagReachTimeout => "NFC_TAG_REACH_TIMEOUT", Retry, "NFC tag reach timed out";
    NfcUnsupportedTagModel => "NFC_UNSUPPORTED_TAG_MODEL", ContactSupport, "NFC unsupported card model";
    CardBrandNotAccepted => "CARD_BRAND_NOT_ACCEPTED", NoAction, "Card not accepted";
    CardInvalidated => "CARD_INVALIDATED", UseAnotherCard, "Card invalidated";
    BlockedCard => "BLOCKED_CARD", UseAnotherCard, "Blocked card";
    ExpiredCard => "EXPIRED_CARD", UseAnotherCard, "Expired card";
    InternalPinpadError => "INTERNAL_PINPAD_ERROR", NoAction, "Internal pinpad error";
    MaxTimeExceeded => "MAX_TIME_EXCEEDED", NoAction, "Maximum time limit for operation exceeded";
    PinpadError => "PINPAD_ERROR", NoAction, "Pinpad error";
    UseChipInvalidPayment => "USE_CHIP_INVALID_PAYMENT", CheckSetup, "Use chip for this transaction / Invalid payment method";
    ResponseTimeExceeded => "RESPONSE_TIME_EXCEEDED", Retry, "Response time exceeded";
    CouldNotLocateReferenceDuplicated => "COULD_NOT_LOCATE_REFERENCE_DUPLICATED", NoAction, "Could not locate the reference is duplicated";
    ReadError => "READ_ERROR", Retry, "Read error try again";
    PrinterMalfunction => "PRINTER_MALFUNCTION", Retry, "Printer malfunction";
    PrinterOverheating => "PRINTER_OVERHEATING", NoAction, "Overheating problem";
    PrintDataFormatError => "PRINT_DATA_FORMAT_ERROR", NoAction, "Invalid print data format";
    NoGsmSignal => "NO_GSM_SIGNAL", NoAction, "No GSM signal";
    SocketConnectionError => "SOCKET_CONNECTION_ERROR", NoAction, "Socket connection error";
    PrinterError => "PRINTER_ERROR", Retry, "Printer error";
    Generic => "GENERIC", NoAction, "Generic error with error code and message";
    MessageBufferOverflow => "MESSAGE_BUFFER_OVERFLOW", ContactSupport, "Message buffer overflow";
    NullTransactionResult => "NULL_TRANSACTION_RESULT", CheckSetup, "Transaction result parameter cannot be null";
    TokenNotFound => "TOKEN_NOT_FOUND", NoAction, "Token not found";
    RootPermissionDetected => "ROOT_PERMISSION_DETECTED", NoAction, "Root permission detected";
    NoAuthenticationData => "NO_AUTHENTICATION_DATA", NoAction, "No authentication data";
    LowBattery => "LOW_BATTERY", CheckSetup, "Low voltage";
    DataPacketFormat => "DATA_PACKET_FORMAT", Retry, "Data packet format error";
    ImageProcessingFailed => "IMAGE_PROCESSING_FAILED", Retry, "Image processing failed";
    SdkPrintUnavailable => "SDK_PRINT_UNAVAILABLE", Retry, "SDK not available for printing";
    DataPackageTooLong => "DATA_PACKAGE_TOO_LONG", CheckSetup, "Data package too long";
    FontLibraryNotInstalled => "FONT_LIBRARY_NOT_INSTALLED", Retry, "Font library not installed";
    PrintingUnfinished => "PRINTING_UNFINISHED", Retry, "Printing unfinished";
    TransactionInvalidAmount => "TRANSACTION_INVALID_AMOUNT", NoAction, "Invalid transaction amount";
    CardReaderNotInitialized => "CARD_READER_NOT_INITIALIZED", CheckSetup, "Card reader not initialized";
    InvalidDeviceId => "INVALID_DEVICE_ID", CheckSetup, "Invalid device identification";
    MissingInstallmentCoefficients => "MISSING_INSTALLMENT_COEFFICIENTS", NoAction, "Missing installment coefficients";
    AuthenticationError => "AUTHENTICATION_ERROR", Retry, "Authentication error";
    NoLastTransactionData => "NO_LAST_TRANSACTION_DATA", Retry, "No last transaction data";
    TerminalCommunicationError => "TERMINAL_COMMUNICATION_ERROR", CheckSetup, "Terminal communication error";
    ApplicationNameRequired => "APPLICATION_NAME_REQUIRED", NoAction, "Application name required";
    ApplicationNameTooLong => "APPLICATION_NAME_TOO_LONG", NoAction, "Application name too long";
    ApplicationVersionTooLong => "APPLICATION_VERSION_TOO_LONG", NoAction, "Application version too long";
    CorruptedReceptionBuffer => "CORRUPTED_RECEPTION_BUFFER", Retry, "Corrupted reception buffer";
    TransactionCodeTooLong => "TRANSACTION_CODE_TOO_LONG", NoAction, "Sale code exceeds length limit";
    InvalidTransactionAmountFormat => "INVALID_TRANSACTION_AMOUNT_FORMAT", NoAction, "Invalid sale value format";
    TransactionNullAmount => "TRANSACTION_NULL_AMOUNT", CheckSetup, "Total transaction value parameter cannot be null";
    ConnectionDriverError => "CONNECTION_DRIVER_ERROR", NoAction, "Connection driver error";
    ConnectionDriverNotFound => "CONNECTION_DRIVER_NOT_FOUND", CheckSetup, "Connection driver not found";
    TransactionNullSaleCode => "TRANSACTION_NULL_SALE_CODE", CheckSetup, "Sale code parameter cannot be null";
    InvalidApplicationParameter => "INVALID_APPLICATION_PARAMETER", ContactSupport, "Invalid application parameter";
    DuplicateReference => "DUPLICATE_REFERENCE", NoAction, "Duplicate reference";
    InternationalCardNotSupported => "INTERNATIONAL_CARD_NOT_SUPPORTED", ContactSupport, "International card not supported";
    InstallmentConfigurationError => "INSTALLMENT_CONFIGURATION_ERROR", ContactSupport, "Installment configuration error";
    AuthenticationRequired => "AUTHENTICATION_REQUIRED", NoAction, "Authentication required";
    TransactionCannotBeRefunded => "TRANSACTION_CANNOT_BE_REFUNDED", NoAction, "Transaction cannot be refunded";
    RefundTimeLimitExceeded => "REFUND_TIME_LIMIT_EXCEEDED", NoAction, "Refund time limit exceeded";
    TerminalUpdateRequired => "TERMINAL_UPDATE_REQUIRED", CheckSetup, "Terminal update required";
    OperationNotCompleted => "OPERATION_NOT_COMPLETED", Retry, "Operation not completed";
    AppUpdate => "APP_UPDATE", CheckSetup, "App update required";
    InvalidCharacters => "INVALID_CHARACTERS", Retry, "Invalid characters in input";
    TransactionNotAuthorizedByServer => "TRANSACTION_NOT_AUTHORIZED_BY_SERVER", NoAction, "Transaction denied by server";
    TerminalNotConfigured => "TERMINAL_NOT_CONFIGURED", Retry, "Terminal not ready";
    InternetConnectionError => "INTERNET_CONNECTION_ERROR", Retry, "Internet connection error";
    AcquirerServerConnectionError => "ACQUIRER_SERVER_CONNECTION_ERROR", NoAction, "Connection error with server";
    ModemInitializationPending => "MODEM_INITIALIZATION_PENDING", Retry, "Modem initialization pending";
    WifiNotConnected => "WIFI_NOT_CONNECTED", CheckSetup, "WiFi not connected";
    NetworkAttachmentError => "NETWORK_ATTACHMENT_ERROR", ContactSupport, "Network attachment error";
    GprsConnectionError => "GPRS_CONNECTION_ERROR", Retry, "GPRS connection error";
    HostResponseTimeout => "HOST_RESPONSE_TIMEOUT", Retry, "Host response timeout";
    TryAgainLater => "TRY_AGAIN_LATER", ContactSupport, "Try again later";
    TelecomProviderUnavailable => "TELECOM_PROVIDER_UNAVAILABLE", NoAction, "Telecommunication provider unavailable";
    OperationRejectedByCard => "OPERATION_REJECTED_BY_CARD", NoAction, "Operation rejected by card";
    OperationNotAuthorizedByHost => "OPERATION_NOT_AUTHORIZED_BY_HOST", ContactSupport, "Operation not authorized by host";
    DeviceNotActivated => "DEVICE_NOT_ACTIVATED", CheckSetup, "Device not activated";
    CashOnlyTransaction => "CASH_ONLY_TRANSACTION", NoAction, "Cash only transaction";
    InvalidTransaction => "INVALID_TRANSACTION", CheckSetup, "Invalid transaction";
    RemoveCardBeforeProceeding => "REMOVE_CARD_BEFORE_PROCEEDING", NoAction, "Remove card before proceeding";
    ChipRequired => "CHIP_REQUIRED", NoAction, "Use CHIP for this transaction";
    TransactionConfirmationError => "TRANSACTION_CONFIRMATION_ERROR", NoAction, "Error confirming transaction";
    OnlyTotalRefundAllowed => "ONLY_TOTAL_REFUND_ALLOWED", NoAction, "Only Total Refund Allowed";
    PasswordRequired => "PASSWORD_REQUIRED", NoAction, "Operation not performed";
    TlvResponseTooLarge => "TLV_RESPONSE_TOO_LARGE", ContactSupport, "TLV response with larger than expected size";
    TransactionAlreadyRefunded => "TRANSACTION_ALREADY_REFUNDED", NoAction, "Transaction already refunded";
    InvalidEntryMode => "INVALID_ENTRY_MODE", NoAction, "Invalid entry mode";
    ConnectionErrorSimWifi => "CONNECTION_ERROR_SIM_WIFI", CheckSetup, "Connection error";
    WifiConnectionError => "WIFI_CONNECTION_ERROR", CheckSetup, "WiFi connection error";
    ConnectionErrorNoInternet => "CONNECTION_ERROR_NO_INTERNET", CheckSetup, "Connection error";
    ConnectionError => "CONNECTION_ERROR", Retry, "Connection error";
    PrinterOvervoltage => "PRINTER_OVERVOLTAGE", NoAction, "Overvoltage problem";
    NotConnectedToWifi => "NOT_CONNECTED_TO_WIFI", CheckSetup, "Not connected to WiFi network";
    WifiNetworkUnavailable => "WIFI_NETWORK_UNAVAILABLE", Retry, "WiFi network unavailable";
    OperationNotAuthorized => "OPERATION_NOT_AUTHORIZED", ContactSupport, "Operation not authorized";
    PrinterOutOfPaper => "PRINTER_OUT_OF_PAPER", Retry, "Printer out of paper";
    PppAuthFailure => "PPP_AUTH_FAILURE", ContactSupport, "PPP authentication failure";
    NoNetworkSignal => "NO_NETWORK_SIGNAL", Retry, "No network signal";
    SimCardMissing => "SIM_CARD_MISSING", Retry, "SIM card missing";
    NetworkOperatorTimeout => "NETWORK_OPERATOR_TIMEOUT", Retry, "Network operator timeout";
    SimCardError => "SIM_CARD_ERROR", Retry, "SIM card error";
    SimCardNotResponding => "SIM_CARD_NOT_RESPONDING", Retry, "SIM card not responding";
    NetworkOperatorUnavailable => "NETWORK_OPERATOR_UNAVAILABLE", Retry, "Network operator unavailable";
    CardOperationFailed => "CARD_OPERATION_FAILED", NoAction, "Card operation failed";
    DeviceDeactivated => "DEVICE_DEACTIVATED", CheckSetup, "Device deactivated";
    NoMessage => "NO_MESSAGE", NoAction, "No message to display";
    InvalidParameter => "INVALID_PARAMETER", Retry, "Invalid parameter";
    InitializationError => "INITIALIZATION_ERROR", Retry, "Initialization error";
    MobileCommunicationError => "MOBILE_COMMUNICATION_ERROR", Retry, "Mobile communication error";
    TransactionFailure => "TRANSACTION_FAILURE", CheckSetup, "Transaction failed";
    TransactionConfirmationInProgress => "TRANSACTION_CONFIRMATION_IN_PROGRESS", Retry, "Transaction confirmation in progress";
    TableLoadingError => "TABLE_LOADING_ERROR", NoAction, "Table loading error";
    PrintErrorLowBattery => "PRINT_ERROR_LOW_BATTERY", Retry, "Print error due to low battery";
    InvalidReaderOrActivationCode => "INVALID_READER_OR_ACTIVATION_CODE", CheckSetup, "Invalid reader or activation code";
    CouldNotConfigureInstallment => "COULD_NOT_CONFIGURE_INSTALLMENT", CheckSetup, "Could not configure installment";
    PleaseLoginAgain => "PLEASE_LOGIN_AGAIN", NoAction, "Please log in to the app again";
    InternationalCardNotAllowed => "INTERNATIONAL_CARD_NOT_ALLOWED", NoAction, "Cannot make sale with international card";
    TryAgain => "TRY_AGAIN", Retry, "Try again";
    EmailNotConfirmed => "EMAIL_NOT_CONFIRMED", CheckSetup, "Email not confirmed";
    SellerBlocked => "SELLER_BLOCKED", ContactSupport, "Seller blocked";
    MaxDateForReversalExceeded => "MAX_DATE_FOR_REVERSAL_EXCEEDED", NoAction, "Maximum date for transaction reversal has been exceeded";
    UpdateApp => "UPDATE_APP", CheckSetup, "Update the app version to proceed with the operation";
    OnlyLettersAndNumbers => "ONLY_LETTERS_AND_NUMBERS", NoAction, "Please enter only letters and numbers";
    CheckPassword => "CHECK_PASSWORD", CheckSetup, "Please check your password";
    MaxCharacters => "MAX_CHARACTERS", NoAction, "Character limit exceeded";
    AccountClosed => "ACCOUNT_CLOSED", ContactSupport, "Account closed";
    CouldNotIdentifyCard => "COULD_NOT_IDENTIFY_CARD", NoAction, "Could not identify the card";
    ErrorReversingTransaction => "ERROR_REVERSING_TRANSACTION", Retry, "Error reversing transaction";
    InvalidInstallmentAmount => "INVALID_INSTALLMENT_AMOUNT", NoAction, "Invalid amount for installment";
    InvalidTransactionPerformCash => "INVALID_TRANSACTION_PERFORM_CASH", NoAction, "Invalid transaction";
    InvalidInstallmentsCount => "INVALID_INSTALLMENTS_COUNT", NoAction, "Invalid number of installments";
    FeatureUnavailable => "FEATURE_UNAVAILABLE", NoAction, "Feature unavailable at the moment";
    ErrorResponseMessageValidation => "ERROR_RESPONSE_MESSAGE_VALIDATION", ContactSupport, "Error validating Response Message";
    OnlyTotalReversalAllowed => "ONLY_TOTAL_REVERSAL_ALLOWED", NoAction, "Only total reversal allowed";
    ProductNotEnabled => "PRODUCT_NOT_ENABLED", NoAction, "Product not enabled";
    MacGenerationFail => "MAC_GENERATION_FAIL", ContactSupport, "Failed to generate MAC";
    TerminalNotFound => "TERMINAL_NOT_FOUND", Retry, "Terminal not found";
    ErrorConfirmingTransaction => "ERROR_CONFIRMING_TRANSACTION", NoAction, "Error confirming transaction";
    ErrorOpeningCryptogram => "ERROR_OPENING_CRYPTOGRAM", ContactSupport, "Error opening cryptogram";
    UseChipForTransaction => "USE_CHIP_FOR_TRANSACTION", NoAction, "Use CHIP for this transaction";
    OperationNotPerformedEnterPassword => "OPERATION_NOT_PERFORMED_ENTER_PASSWORD", NoAction, "Operation not performed";
    DuplicateTransaction => "DUPLICATE_TRANSACTION", NoAction, "Duplicate transaction";
    TransactionCannotBeCancelled => "TRANSACTION_CANNOT_BE_CANCELLED", NoAction, "Transaction cannot be cancelled";
    InvalidPaymentMethod => "INVALID_PAYMENT_METHOD", NoAction, "Invalid payment method";
    ResponseTlvSize => "RESPONSE_TLV_SIZE", NoAction, "Response TLV with size larger than expected";
    CardReadError => "CARD_READ_ERROR", NoAction, "Card read error";
    CardReadCanceled => "CARD_READ_CANCELED", NoAction, "Card read operation was canceled";
    CardReadMultiError => "CARD_READ_MULTI_ERROR", Retry, "Multiple cards detected during read operation";
    CardHolderReadError => "CARD_HOLDER_READ_ERROR", NoAction, "Unable to read card holder information";
    PinpadConnectionNotFound => "PINPAD_CONNECTION_NOT_FOUND", Retry, "Pinpad connection not found";
    PinpadAlreadyConnected => "PINPAD_ALREADY_CONNECTED", NoAction, "Pinpad already connected";
    PinpadClosedConnection => "PINPAD_CLOSED_CONNECTION", NoAction, "Pinpad connection was closed";
    IoErrorWithPinpad => "IO_ERROR_WITH_PINPAD", NoAction, "Input/Output error with pinpad";
    TransactionAppBlocked => "TRANSACTION_APP_BLOCKED", NoAction, "Transaction application is blocked";
    CvvNotProvided => "CVV_NOT_PROVIDED", NoAction, "CVV was not provided";
    CvvInvalid => "CVV_INVALID", NoAction, "Invalid CVV provided";
    NoTransactionType => "NO_TRANSACTION_TYPE", NoAction, "No transaction type specified";
    WrongTransactionType => "WRONG_TRANSACTION_TYPE", NoAction, "Wrong transaction type selected";
    InvalidApplication => "INVALID_APPLICATION", NoAction, "Invalid application selected";
    InvalidApplicationIndex => "INVALID_APPLICATION_INDEX", NoAction, "Invalid application index";
    OnlineProcessingError => "ONLINE_PROCESSING_ERROR", NoAction, "Online processing error";
    EmvProcessingError => "EMV_PROCESSING_ERROR", NoAction, "EMV processing error";
    EmvCardConnectionError => "EMV_CARD_CONNECTION_ERROR", NoAction, "EMV card connection failed";
    EmvNoApplication => "EMV_NO_APPLICATION", NoAction, "No EMV application found";
    EmvCapkError => "EMV_CAPK_ERROR", NoAction, "EMV CAPK error";
    EmvTlvError => "EMV_TLV_ERROR", NoAction, "EMV TLV error";
    EmvAidError => "EMV_AID_ERROR", NoAction, "EMV AID error";
    PinEntryError => "PIN_ENTRY_ERROR", NoAction, "PIN entry error";
    PinKeyError => "PIN_KEY_ERROR", NoAction, "PIN key error";
    PinNoInput => "PIN_NO_INPUT", NoAction, "No PIN input provided";
    PinInitializationError => "PIN_INITIALIZATION_ERROR", NoAction, "PIN initialization error";
    PinEncryptionError => "PIN_ENCRYPTION_ERROR", NoAction, "PIN encryption error";
    PinKeyNotFound => "PIN_KEY_NOT_FOUND", NoAction, "PIN key not found";
    NfcNotSupported => "NFC_NOT_SUPPORTED", ContactSupport, "NFC not supported";
    NfcOperationAborted => "NFC_OPERATION_ABORTED", NoAction, "NFC operation aborted";
    NfcWrongCardType => "NFC_WRONG_CARD_TYPE", NoAction, "Wrong card type for NFC";
    NfcInvalidKey => "NFC_INVALID_KEY", NoAction, "Invalid NFC key";
    NfcNotAuthenticated => "NFC_NOT_AUTHENTICATED", NoAction, "NFC not authenticated";
    InvalidSectorNumber => "INVALID_SECTOR_NUMBER", NoAction, "Invalid sector number";
    InvalidBlockNumber => "INVALID_BLOCK_NUMBER", NoAction, "Invalid block number";
    InvalidBlockFormat => "INVALID_BLOCK_FORMAT", NoAction, "Invalid block format";
    QrcodeGenerationError => "QRCODE_GENERATION_ERROR", NoAction, "QR code generation error";
    QrcodeExpired => "QRCODE_EXPIRED", NoAction, "QR code expired";
    NfcCartReadError => "NFC_CART_READ_ERROR", NoAction, "NFC cart read error";
    NfcCartWriteError => "NFC_CART_WRITE_ERROR", NoAction, "NFC cart write error";
    NfcCartHeaderInvalid => "NFC_CART_HEADER_INVALID", NoAction, "NFC cart header invalid";
    NfcInsufficientSpace => "NFC_INSUFFICIENT_SPACE", NoAction, "NFC insufficient space";
    NfcCartItemNotFound => "NFC_CART_ITEM_NOT_FOUND", NoAction, "NFC cart item not found";
    TransactionFallback => "TRANSACTION_FALLBACK", NoAction, "Transaction fallback initiated";
    InvalidCardMode => "INVALID_CARD_MODE", NoAction, "Invalid card mode";
    TooManyCards => "TOO_MANY_CARDS", NoAction, "Too many cards detected";
    DeviceMisconfigured => "DEVICE_MISCONFIGURED", CheckSetup, "Device misconfigured";
    ActivationError => "ACTIVATION_ERROR", NoAction, "Activation error";
    SdkVersionOutdated => "SDK_VERSION_OUTDATED", CheckSetup, "SDK version outdated";
    AppNameNotSet => "APP_NAME_NOT_SET", CheckSetup, "Application name not set";
    NoActiveApplication => "NO_ACTIVE_APPLICATION", NoAction, "No active application";
    MultipleProviderInstances => "MULTIPLE_PROVIDER_INSTANCES", NoAction, "Multiple provider instances running";
    UnknownUserType => "UNKNOWN_USER_TYPE", ContactSupport, "Unknown user type";
    TransactionObjectNull => "TRANSACTION_OBJECT_NULL", NoAction, "Transaction object is null";
    EmailError => "EMAIL_ERROR", NoAction, "Email error";
    EmailClientError => "EMAIL_CLIENT_ERROR", NoAction, "Email client error";
    EmailEmpty => "EMAIL_EMPTY", NoAction, "Email address is empty";
    EmailRecipientEmpty => "EMAIL_RECIPIENT_EMPTY", NoAction, "Email recipient is empty";
    DataConstraintError => "DATA_CONSTRAINT_ERROR", NoAction, "Data constraint error";
    DataIntegrationError => "DATA_INTEGRATION_ERROR", NoAction, "Data integration error";
    SwitchInterfaceError => "SWITCH_INTERFACE_ERROR", NoAction, "Switch interface error";
    SwipeIncorrect => "SWIPE_INCORRECT", Retry, "Swipe incorrect";
    NullResponse => "NULL_RESPONSE", NoAction, "Null response received";
    ErrorResponse => "ERROR_RESPONSE", NoAction, "Error response received";
    CardRemovedByUser => "CARD_REMOVED_BY_USER", NoAction, "Card was removed by user";
    ChipCardReadError => "CHIP_CARD_READ_ERROR", NoAction, "Cannot read chip card";
    CardGenericError => "CARD_GENERIC_ERROR", NoAction, "Generic card error";
    DeviceNotCompatible => "DEVICE_NOT_COMPATIBLE", NoAction, "Device not compatible";
    MagStripeChipDetected => "MAG_STRIPE_CHIP_DETECTED", NoAction, "Magnetic stripe passed but chip card detected";
    InvalidStoneCode => "INVALID_STONE_CODE", NoAction, "Invalid Stone code";
    UserModelNotFound => "USER_MODEL_NOT_FOUND", NoAction, "User model not found";
    InvalidOrUnknownStoneCode => "INVALID_OR_UNKNOWN_STONE_CODE", NoAction, "Invalid or unknown Stone code";
    PrinterInitializationError => "PRINTER_INITIALIZATION_ERROR", NoAction, "Printer initialization error";
    PrinterUnsupportedFormat => "PRINTER_UNSUPPORTED_FORMAT", ContactSupport, "Printer unsupported format";
    PrinterInvalidData => "PRINTER_INVALID_DATA", NoAction, "Printer invalid data";
    NoPrintSupport => "NO_PRINT_SUPPORT", ContactSupport, "No print support";
    InternalSystemError => "INTERNAL_SYSTEM_ERROR", NoAction, "Internal system error";
    TablesNotFound => "TABLES_NOT_FOUND", NoAction, "Tables not found";
    NeedLoadTables => "NEED_LOAD_TABLES", NoAction, "Need to load tables";
    InvalidAcquirerActivationCode => "INVALID_ACQUIRER_ACTIVATION_CODE", NoAction, "Invalid acquirer activation code";
    ReversalPending => "REVERSAL_PENDING", NoAction, "Reversal pending";
    TransactionPending => "TRANSACTION_PENDING", NoAction, "Transaction is pending";
    CancelledAwaitingReversal => "CANCELLED_AWAITING_REVERSAL", Retry, "Transaction cancelled and awaiting reversal";
    FraudSuspicion => "FRAUD_SUSPICION", NoAction, "Fraud suspicion detected";
    CheckCardDetails => "CHECK_CARD_DETAILS", CheckSetup, "Check card details";
    UseCreditMethod => "USE_CREDIT_METHOD", NoAction, "Use credit card method";
    UseDebitMethod => "USE_DEBIT_METHOD", NoAction, "Use debit card method";
    CheckSpecialConditions => "CHECK_SPECIAL_CONDITIONS", CheckSetup, "Check special conditions";
    ApproveAfterIdentityVerification => "APPROVE_AFTER_IDENTITY_VERIFICATION", NoAction, "Approval after identity verification is required";
    UnacceptableFee => "UNACCEPTABLE_FEE", NoAction, "Card error";
    CardWithRestriction => "CARD_WITH_RESTRICTION", NoAction, "Card with restriction";
    ExceededPasswordAttempts => "EXCEEDED_PASSWORD_ATTEMPTS", NoAction, "Exceeded password attempts";
    LostCard => "LOST_CARD", NoAction, "Card was lost";
    StolenCard => "STOLEN_CARD", NoAction, "Card was stolen";
    ExceededHealthValueLimit => "EXCEEDED_HEALTH_VALUE_LIMIT", NoAction, "Exceeded health value limit";
    ExceededWithdrawalQuantityLimit => "EXCEEDED_WITHDRAWAL_QUANTITY_LIMIT", NoAction, "Exceeded withdrawal quantity limit";
    CutoverInProcess => "CUTOVER_IN_PROCESS", NoAction, "Cutover in process";
    ViolationOfLaw => "VIOLATION_OF_LAW", NoAction, "Violation of law";
    ReconciliationError => "RECONCILIATION_ERROR", NoAction, "Reconciliation error";
    PoorStatusDestination => "POOR_STATUS_DESTINATION", NoAction, "Poor status destination";
    PoorStatusOrigin => "POOR_STATUS_ORIGIN", NoAction, "Poor status origin";
    RejectedKeyVerificationFailed => "REJECTED_KEY_VERIFICATION_FAILED", NoAction, "Rejected key verification failed";
    IssuerUnavailable => "ISSUER_UNAVAILABLE", NoAction, "Issuer unavailable";
    InvalidLifeCycle => "INVALID_LIFE_CYCLE", NoAction, "Invalid life cycle";
    UnblockTheCard => "UNBLOCK_THE_CARD", NoAction, "Unblock the card";
    CanceledByUser => "CANCELED_BY_USER", NoAction, "User canceled operation";
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn taxonomy_is_large_and_names_are_unique() {
        assert!(ProcessingErrorEvent::ALL.len() >= 300);

        let names: HashSet<&str> = ProcessingErrorEvent::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), ProcessingErrorEvent::ALL.len());
    }

    #[test]
    fn every_name_resolves_back_to_its_kind() {
        for kind in ProcessingErrorEvent::ALL {
            assert_eq!(ProcessingErrorEvent::from_name(kind.as_str()), Some(*kind));
            assert!(!kind.description().is_empty());
        }
    }

    #[rstest]
    #[case::timeout(ProcessingErrorEvent::OperationTimeout, Remediation::Retry)]
    #[case::refused_card(ProcessingErrorEvent::InvalidCardNotAccepted, Remediation::UseAnotherCard)]
    #[case::support(ProcessingErrorEvent::PreauthNotEnabled, Remediation::ContactSupport)]
    #[case::generic(ProcessingErrorEvent::Generic, Remediation::NoAction)]
    fn remediation_is_attached_to_the_kind(
        #[case] kind: ProcessingErrorEvent,
        #[case] remediation: Remediation,
    ) {
        assert_eq!(kind.remediation(), remediation);
    }

    #[test]
    fn from_message_is_lenient() {
        assert_eq!(
            ProcessingErrorEvent::from_message("  communication_error "),
            ProcessingErrorEvent::CommunicationError
        );
        assert_eq!(
            ProcessingErrorEvent::from_message("something else"),
            ProcessingErrorEvent::Generic
        );
    }

    #[test]
    fn serde_uses_wire_names() {
        let s = serde_json::to_string(&ProcessingErrorEvent::CardRemovedByUser).unwrap();
        assert_eq!(s, "\"CARD_REMOVED_BY_USER\"");

        let back: ProcessingErrorEvent = serde_json::from_str(&s).unwrap();
        assert_eq!(back, ProcessingErrorEvent::CardRemovedByUser);

        assert!(serde_json::from_str::<ProcessingErrorEvent>("\"NOPE\"").is_err());
    }
}
