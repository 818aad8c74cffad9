//! ブラウザ向けログ設定
//!
//! tracing のイベントを1行ずつブラウザのコンソールへ流す。

use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// 1イベント分をためて、破棄時にコンソールへ出す
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self { level, buffer: Vec::new() }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if line.is_empty() {
            return;
        }
        let value = JsValue::from_str(line);
        if self.level == Level::ERROR {
            web_sys::console::error_1(&value);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&value);
        } else {
            web_sys::console::log_1(&value);
        }
    }
}

/// レベルに応じて `console.error` / `console.warn` / `console.log` を使い分ける
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// ロガーを初期化する（`?debug=1` のときは debug まで出す）
pub fn init(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };
    let result = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(max_level)
        .with_target(false)
        .without_time()
        .try_init();
    if result.is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logger already initialized"));
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod tests {
    use super::*;
    use std::io::Write;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_writer_buffers_until_drop() {
        let mut writer = ConsoleMakeWriter.make_writer();
        writer.write_all(b"hello ").expect("書き込み失敗");
        writer.write_all(b"console\n").expect("書き込み失敗");
        assert_eq!(writer.buffer, b"hello console\n");
        assert_eq!(writer.level, Level::INFO);
    }

    #[wasm_bindgen_test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
        tracing::info!("logging initialized");
    }
}
