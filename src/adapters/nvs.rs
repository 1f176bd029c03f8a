//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`HungerStore`] and [`ConfigStore`].
//!
//! - `target_os = "espidf"` — blobs in the NVS flash partition via raw
//!   sys calls; writes are atomic per `nvs_commit()`.
//! - host — an in-memory map, so tests exercise the same adapter code.
//!
//! Namespaces isolate the subsystems: the hunger meter lives under
//! `pet_data`, configuration overrides under `pet_cfg`.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigStore, HungerStore, StorageError};
use crate::config::PetConfig;

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const HUNGER_NAMESPACE: &str = "pet_data";
const HUNGER_KEY: &str = "hunger";

const CONFIG_NAMESPACE: &str = "pet_cfg";
const CONFIG_KEY: &str = "petcfg";

#[allow(dead_code)]
const MAX_BLOB_SIZE: usize = 512;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create the adapter and initialise NVS flash.
    ///
    /// On first boot or after an IDF version bump the partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any other
            // NVS access exists.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Open an NVS namespace, run a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = namespace.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

fn validate_config(cfg: &PetConfig) -> Result<(), ConfigError> {
    if cfg.transition_duration_ms == 0 || cfg.transition_duration_ms > 2000 {
        return Err(ConfigError::ValidationFailed(
            "transition_duration_ms must be 1-2000",
        ));
    }
    if cfg.blink_duration_ms < 40 || cfg.blink_duration_ms > 2000 {
        return Err(ConfigError::ValidationFailed(
            "blink_duration_ms must be 40-2000",
        ));
    }
    if cfg.min_blink_interval_ms >= cfg.max_blink_interval_ms {
        return Err(ConfigError::ValidationFailed(
            "min_blink_interval_ms must be < max_blink_interval_ms",
        ));
    }
    if cfg.min_neutral_dwell_ms >= cfg.max_neutral_dwell_ms {
        return Err(ConfigError::ValidationFailed(
            "min_neutral_dwell_ms must be < max_neutral_dwell_ms",
        ));
    }
    if cfg.min_emotion_dwell_ms >= cfg.max_emotion_dwell_ms {
        return Err(ConfigError::ValidationFailed(
            "min_emotion_dwell_ms must be < max_emotion_dwell_ms",
        ));
    }
    if cfg.blink_probability_percent > 100
        || cfg.neutral_return_probability_percent > 100
        || cfg.emotion_category_probability_percent > 100
    {
        return Err(ConfigError::ValidationFailed(
            "probabilities must be 0-100",
        ));
    }
    if cfg.hunger_decay_interval_ms == 0 || cfg.hunger_decay_step_percent == 0 {
        return Err(ConfigError::ValidationFailed(
            "hunger decay interval and step must be non-zero",
        ));
    }
    if cfg.frame_interval_ms == 0 || cfg.frame_interval_ms > 1000 {
        return Err(ConfigError::ValidationFailed(
            "frame_interval_ms must be 1-1000",
        ));
    }
    Ok(())
}

impl HungerStore for NvsAdapter {
    fn load_hunger(&self) -> u8 {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(HUNGER_NAMESPACE, HUNGER_KEY);
            match self.store.borrow().get(&key).and_then(|b| b.first()) {
                Some(&level) if level <= 100 => level,
                Some(_) => {
                    warn!("NvsAdapter: stored hunger out of range, using 100");
                    100
                }
                None => 100,
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(HUNGER_NAMESPACE, false, |handle| {
                let key_cstr = b"hunger\0";
                let mut value: u8 = 0;
                let ret = unsafe { nvs_get_u8(handle, key_cstr.as_ptr() as *const _, &mut value) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(value)
            });
            match result {
                Ok(level) if level <= 100 => level,
                Ok(_) => {
                    warn!("NvsAdapter: stored hunger out of range, using 100");
                    100
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("NvsAdapter: no stored hunger, starting full");
                    100
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {e}, starting full");
                    100
                }
            }
        }
    }

    fn save_hunger(&mut self, level: u8) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(HUNGER_NAMESPACE, HUNGER_KEY);
            self.store.borrow_mut().insert(key, vec![level]);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(HUNGER_NAMESPACE, true, |handle| {
                let key_cstr = b"hunger\0";
                let ret = unsafe { nvs_set_u8(handle, key_cstr.as_ptr() as *const _, level) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NvsAdapter: NVS write error {e}");
                if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                    StorageError::Full
                } else {
                    StorageError::IoError
                }
            })
        }
    }
}

impl ConfigStore for NvsAdapter {
    fn load_config(&self) -> Result<PetConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            if let Some(bytes) = self.store.borrow().get(&key) {
                let cfg: PetConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                validate_config(&cfg)?;
                info!("NvsAdapter: loaded config from store");
                Ok(cfg)
            } else {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(PetConfig::default())
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, false, |handle| {
                let key_cstr = b"petcfg\0";
                let mut size: usize = 0;

                // First call: get size.
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        core::ptr::null_mut(),
                        &mut size,
                    )
                };
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    return Err(ESP_ERR_NVS_NOT_FOUND);
                }
                if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ret);
                }

                let mut buf = vec![0u8; size];
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }

                Ok(buf)
            });

            match result {
                Ok(bytes) => {
                    let cfg: PetConfig =
                        postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                    validate_config(&cfg)?;
                    info!("NvsAdapter: loaded config from NVS ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(PetConfig::default())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {e}, using defaults");
                    Ok(PetConfig::default())
                }
            }
        }
    }

    fn save_config(&mut self, config: &PetConfig) -> Result<(), ConfigError> {
        validate_config(config)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
            self.store.borrow_mut().insert(key, bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, true, |handle| {
                let key_cstr = b"petcfg\0";
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {e}");
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}
