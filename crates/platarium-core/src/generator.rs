//! Identity generation and restoration
//!
//! [`KeyGenerator`] composes the pieces:
//!
//! ```text
//! mnemonic + companion ──► master seed ──┬─► BIP-32 ──► account key pair
//!                                        └─► HKDF   ──► signature key pair
//!                                                        │
//!                         correlation check ◄────────────┘
//! ```
//!
//! A bundle is released only after the correlation check passes. Seeds are
//! held in [`SecretBytes`](crate::memory::SecretBytes) and wiped on every
//! exit path.

use std::sync::Arc;

use bip39::Mnemonic;
use secp256k1::{All, PublicKey, Secp256k1};
use zeroize::{Zeroize, Zeroizing};

use crate::correlation::verify_correlation;
use crate::error::KeyError;
use crate::identity::{
    DerivationPaths, IdentityBundle, ACCOUNT_KEY_PREFIX, PUBLIC_KEY_PREFIX, SIGNATURE_KEY_PREFIX,
};
use crate::keys::{
    account_path, derive_account_key, derive_key_pair, derive_signature_seed, public_key_hex,
    secret_key_hex, DEFAULT_HKDF_INFO, DEFAULT_HKDF_SALT, MAX_ACCOUNT_INDEX, SIGNATURE_PATH_TAG,
};
use crate::logger::{ErrorContext, FacadeLogger, KeyLogger};
use crate::random::{random_alphanumeric, CHARACTER_SET, COMPANION_CODE_LEN};
use crate::seed::{derive_master_seed, parse_mnemonic, OsSecretSource, SecretSource};

/// Derives Platarium identities from a mnemonic and companion code.
pub struct KeyGenerator {
    index: u32,
    salt: Vec<u8>,
    info: Vec<u8>,
    custom_path: Option<String>,
    companion_length: usize,
    secp: Secp256k1<All>,
    source: Arc<dyn SecretSource>,
    logger: Arc<dyn KeyLogger>,
}

impl KeyGenerator {
    /// Create a generator.
    ///
    /// # Errors
    /// [`KeyError::InvalidArgument`] if `index >= 2^31 - 1` or `salt`/`info`
    /// is empty. An empty `custom_path` is treated as no override.
    pub fn new(
        index: u32,
        salt: impl Into<Vec<u8>>,
        info: impl Into<Vec<u8>>,
        custom_path: Option<String>,
    ) -> Result<Self, KeyError> {
        validate_index(index)?;
        let salt = salt.into();
        let info = info.into();
        if salt.is_empty() {
            return Err(KeyError::InvalidArgument("HKDF salt must not be empty".into()));
        }
        if info.is_empty() {
            return Err(KeyError::InvalidArgument("HKDF info must not be empty".into()));
        }

        Ok(Self {
            index,
            salt,
            info,
            custom_path: custom_path.filter(|p| !p.is_empty()),
            companion_length: COMPANION_CODE_LEN,
            secp: Secp256k1::new(),
            source: Arc::new(OsSecretSource),
            logger: Arc::new(FacadeLogger),
        })
    }

    /// Generator with the default salt/info and BIP-44 path at `index`.
    pub fn with_index(index: u32) -> Result<Self, KeyError> {
        Self::new(index, DEFAULT_HKDF_SALT, DEFAULT_HKDF_INFO, None)
    }

    pub fn with_logger(mut self, logger: Arc<dyn KeyLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_secret_source(mut self, source: Arc<dyn SecretSource>) -> Self {
        self.source = source;
        self
    }

    /// Length of the companion code created by [`generate_identity`](Self::generate_identity).
    pub fn with_companion_length(mut self, length: usize) -> Result<Self, KeyError> {
        if length == 0 {
            return Err(KeyError::InvalidArgument(
                "companion code length must be positive".into(),
            ));
        }
        self.companion_length = length;
        Ok(self)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn info(&self) -> &[u8] {
        &self.info
    }

    pub fn custom_path(&self) -> Option<&str> {
        self.custom_path.as_deref()
    }

    /// The account path this generator uses by default.
    pub fn main_path(&self) -> String {
        resolve_path(self.custom_path.as_deref(), self.index)
    }

    /// Create a brand-new identity.
    ///
    /// The companion code used for seed derivation is generated here,
    /// independently of anything the secret source returns alongside the
    /// mnemonic.
    pub fn generate_identity(&self) -> Result<IdentityBundle, KeyError> {
        const OP: &str = "generate_identity";

        match self.generate_inner() {
            Ok(bundle) => {
                self.logger
                    .log_info(OP, "Successful key generation", self.index);
                Ok(bundle)
            }
            Err(e) => Err(self.report(OP, self.index, e)),
        }
    }

    /// Rebuild an identity from its mnemonic and companion code.
    ///
    /// `index` and `path` default to the generator's own settings. When a
    /// path is given, `index` does not affect derivation.
    pub fn restore_identity(
        &self,
        mnemonic: &str,
        companion_code: &str,
        index: Option<u32>,
        path: Option<&str>,
    ) -> Result<IdentityBundle, KeyError> {
        self.restore_with_check(
            mnemonic,
            companion_code,
            index,
            path,
            (self.salt.as_slice(), self.info.as_slice()),
        )
    }

    /// Restore, but run the correlation check against `check` (salt, info)
    /// instead of the generator's own HKDF parameters.
    pub(crate) fn restore_with_check(
        &self,
        mnemonic: &str,
        companion_code: &str,
        index: Option<u32>,
        path: Option<&str>,
        check: (&[u8], &[u8]),
    ) -> Result<IdentityBundle, KeyError> {
        const OP: &str = "restore_identity";
        let index = index.unwrap_or(self.index);

        // Mnemonic errors take precedence over a bad index
        let result = parse_mnemonic(mnemonic).and_then(|mnemonic| {
            validate_index(index)?;
            let path = path.or(self.custom_path.as_deref());
            self.build_identity(OP, &mnemonic, companion_code, index, path, check)
        });

        match result {
            Ok(bundle) => {
                self.logger.log_info(OP, "Successful key restoration", index);
                Ok(bundle)
            }
            Err(e) => Err(self.report(OP, index, e)),
        }
    }

    fn generate_inner(&self) -> Result<IdentityBundle, KeyError> {
        let (mut phrase, mut source_companion) = self.source.new_mnemonic_and_companion()?;
        source_companion.zeroize();

        let parsed = parse_mnemonic(&phrase);
        phrase.zeroize();
        let mnemonic = parsed.map_err(|_| {
            KeyError::InvalidMnemonic("generated mnemonic is not valid according to BIP-39".into())
        })?;

        let companion = Zeroizing::new(random_alphanumeric(self.companion_length, CHARACTER_SET)?);
        self.build_identity(
            "generate_identity",
            &mnemonic,
            &companion,
            self.index,
            self.custom_path.as_deref(),
            (self.salt.as_slice(), self.info.as_slice()),
        )
    }

    fn build_identity(
        &self,
        operation: &'static str,
        mnemonic: &Mnemonic,
        companion_code: &str,
        index: u32,
        path: Option<&str>,
        (check_salt, check_info): (&[u8], &[u8]),
    ) -> Result<IdentityBundle, KeyError> {
        let master_seed = derive_master_seed(mnemonic, companion_code);
        let main_path = resolve_path(path, index);

        let mut account_sk = derive_account_key(&self.secp, &master_seed, &main_path)?;
        let account_pk = PublicKey::from_secret_key(&self.secp, &account_sk);
        let account_hex = secret_key_hex(&account_sk);
        account_sk.non_secure_erase();
        let account_hex = Zeroizing::new(account_hex?);

        let signature_seed = derive_signature_seed(master_seed.as_bytes(), &self.salt, &self.info)?;
        let signature_pair = derive_key_pair(&self.secp, signature_seed.as_bytes())?;

        let correlated = verify_correlation(
            &account_hex,
            &signature_pair.private_key,
            master_seed.as_bytes(),
            check_salt,
            check_info,
        )?;
        if !correlated {
            return Err(KeyError::CorrelationFailure);
        }
        self.logger.log_info(operation, "Key correlation verified", index);

        Ok(IdentityBundle {
            mnemonic: mnemonic.to_string(),
            companion_code: companion_code.to_string(),
            derivation_paths: DerivationPaths {
                main_path,
                signature_path: SIGNATURE_PATH_TAG.to_string(),
            },
            public_key: format!("{}{}", PUBLIC_KEY_PREFIX, public_key_hex(&account_pk)),
            private_key: format!("{}{}", ACCOUNT_KEY_PREFIX, account_hex.as_str()),
            signature_key: format!("{}{}", SIGNATURE_KEY_PREFIX, signature_pair.private_key),
        })
    }

    fn report(&self, operation: &'static str, index: u32, error: KeyError) -> KeyError {
        self.logger
            .log_error(&ErrorContext::now(operation, index), &error);
        error
    }
}

impl std::fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGenerator")
            .field("index", &self.index)
            .field("custom_path", &self.custom_path)
            .field("companion_length", &self.companion_length)
            .finish_non_exhaustive()
    }
}

fn validate_index(index: u32) -> Result<(), KeyError> {
    if index >= MAX_ACCOUNT_INDEX {
        return Err(KeyError::InvalidArgument(format!(
            "index must be in the range [0, {}]",
            MAX_ACCOUNT_INDEX - 1
        )));
    }
    Ok(())
}

fn resolve_path(custom: Option<&str>, index: u32) -> String {
    match custom {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => account_path(index),
    }
}
