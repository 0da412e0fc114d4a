//! Page Bootstrap
//!
//! Configuration, guild id and logging setup read from the hosting page.

use macro_core::EditorConfig;
use percent_encoding::percent_decode_str;
use wasm_bindgen::JsValue;

/// Global the hosting page may define to override defaults
const CONFIG_GLOBAL: &str = "__MACRO_EDITOR_CONFIG__";

/// Read `window.__MACRO_EDITOR_CONFIG__`. `Ok(None)` when the page sets none.
pub fn read_page_config() -> Result<Option<EditorConfig>, String> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).unwrap_or(JsValue::UNDEFINED);
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }

    let config = serde_wasm_bindgen::from_value::<EditorConfig>(value).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(Some(config))
}

/// Guild id of the current page, from `/guilds/{id}` or `?guildId=`
pub fn guild_id_from_location() -> Option<String> {
    let location = web_sys::window()?.location();
    let path = location.pathname().unwrap_or_default();
    let query = location.search().unwrap_or_default();
    guild_id_from(&path, &query)
}

pub fn guild_id_from(path: &str, query: &str) -> Option<String> {
    let from_path = path
        .split('/')
        .skip_while(|segment| *segment != "guilds")
        .nth(1)
        .map(str::to_string);

    let from_query = || {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "guildId")
            .map(|(_, value)| value.to_string())
    };

    from_path
        .filter(|id| !id.is_empty())
        .or_else(from_query)
        .map(|raw| percent_decode_str(&raw).decode_utf8_lossy().into_owned())
        .filter(|id| !id.trim().is_empty())
}

/// Install the ring-buffer logger, mirroring lines to the browser console
pub fn init_logging(capacity: usize) {
    let sink: rolling_logger::Sink = Box::new(|level, line| {
        let line = JsValue::from_str(line);
        match level {
            tracing::Level::ERROR => web_sys::console::error_1(&line),
            tracing::Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    });
    if let Err(e) = rolling_logger::init_logger(capacity, Some(sink)) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger: {e}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guild_id_from_path() {
        assert_eq!(guild_id_from("/guilds/1234/macros", ""), Some("1234".to_string()));
        assert_eq!(guild_id_from("/guilds/1234", "?guildId=999"), Some("1234".to_string()));
    }

    #[test]
    fn test_guild_id_from_query() {
        assert_eq!(guild_id_from("/editor", "?tab=1&guildId=77"), Some("77".to_string()));
        assert_eq!(guild_id_from("/guilds/", "?guildId=a%20b"), Some("a b".to_string()));
    }

    #[test]
    fn test_missing_guild_id() {
        assert_eq!(guild_id_from("/", ""), None);
        assert_eq!(guild_id_from("/editor", "?guildId="), None);
    }
}
