//! HTTP翻译后端
//!
//! 对接DeepLX兼容的翻译API。批量翻译使用索引标记模式：每个文本前加上
//! `[i]` 标记后合并为一次请求，再按索引解析返回结果。

use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::api_constants::is_supported_language;
use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::language::{Language, TextTranslator, TranslationBackend};
use crate::translation_error;

/// HTTP翻译后端
pub struct HttpBackend {
    client: Client,
    api_url: String,
}

impl HttpBackend {
    /// 根据配置创建HTTP客户端
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url().to_string(),
        })
    }
}

impl TranslationBackend for HttpBackend {
    fn translator(&self, from: &Language, to: &Language) -> Option<Box<dyn TextTranslator>> {
        if from == to || !is_supported_language(from.code()) || !is_supported_language(to.code()) {
            return None;
        }

        Some(Box::new(HttpTranslator {
            client: self.client.clone(),
            api_url: self.api_url.clone(),
            source_lang: from.code().to_string(),
            target_lang: to.code().to_string(),
        }))
    }
}

/// 绑定到单个语言对的HTTP翻译器
pub struct HttpTranslator {
    client: Client,
    api_url: String,
    source_lang: String,
    target_lang: String,
}

impl HttpTranslator {
    /// 发送一次翻译请求并取出译文
    fn request(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&json!({
                "text": text,
                "source_lang": self.source_lang,
                "target_lang": self.target_lang
            }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(translation_error!(translation_api, status.as_u16(), body, self.api_url));
        }

        let response_text = response.text()?;
        Ok(extract_translated_text(&response_text))
    }
}

impl TextTranslator for HttpTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        self.request(text)
    }

    fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let indexed_text = build_indexed_text(texts);
        debug!("🚀 索引翻译: {} 个文本项", texts.len());

        let translated_text = self.request(&indexed_text)?;
        let indexed = parse_indexed_text(&translated_text)?;

        let (translations, missing) = merge_indexed(texts, indexed);
        if missing > 0 {
            warn!("❌ {} 个文本项未返回译文，保留原文", missing);
        }

        Ok(translations)
    }
}

/// 为每个文本加上索引标记，合并为多行文本
///
/// 文本内部的换行会被压缩为空格，保证每个文本项只占一行。
pub fn build_indexed_text(texts: &[String]) -> String {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("[{}] {}", i, text.split_whitespace().collect::<Vec<_>>().join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 解析索引标记的翻译结果
pub fn parse_indexed_text(translated_text: &str) -> Result<Vec<(usize, String)>> {
    let index_regex =
        Regex::new(r"^\[(\d+)\]\s*(.*)$").map_err(|e| translation_error!(config, "index_regex", e))?;
    let mut translations = Vec::new();

    for line in translated_text.lines() {
        if let Some(captures) = index_regex.captures(line.trim()) {
            if let (Some(index_str), Some(text)) = (captures.get(1), captures.get(2)) {
                if let Ok(index) = index_str.as_str().parse::<usize>() {
                    let translated = text.as_str().trim();
                    if !translated.is_empty() {
                        translations.push((index, translated.to_string()));
                    }
                }
            }
        }
    }

    Ok(translations)
}

/// 按索引把译文放回原位，返回合并结果和缺失的项数
///
/// 缺失的项保留原文；超出范围的索引被忽略；重复的索引以最后一次出现为准。
pub fn merge_indexed(texts: &[String], indexed: Vec<(usize, String)>) -> (Vec<String>, usize) {
    let mut slots: Vec<Option<String>> = vec![None; texts.len()];
    for (index, translation) in indexed {
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(translation);
        }
    }

    let missing = slots.iter().filter(|slot| slot.is_none()).count();
    let merged = slots
        .into_iter()
        .zip(texts)
        .map(|(translation, source)| translation.unwrap_or_else(|| source.clone()))
        .collect();

    (merged, missing)
}

/// 从API响应中取出译文，兼容 `data` / `text` / `result` 字段和纯文本响应
fn extract_translated_text(response_text: &str) -> String {
    if let Ok(json_val) = serde_json::from_str::<serde_json::Value>(response_text) {
        json_val
            .get("data")
            .or_else(|| json_val.get("text"))
            .or_else(|| json_val.get("result"))
            .and_then(|v| v.as_str())
            .unwrap_or(response_text)
            .to_string()
    } else {
        response_text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslationError;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn backend() -> HttpBackend {
        HttpBackend::new(&TranslatorConfig::new()).unwrap()
    }

    fn strings(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    /// 本地桩服务：接受一个请求，返回固定的状态和响应体，并交回收到的请求体
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/translate", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let read = stream.read(&mut chunk).unwrap();
                request.extend_from_slice(&chunk[..read]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length || read == 0 {
                        break;
                    }
                }
                if read == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (url, handle)
    }

    fn translator_for(url: &str) -> Box<dyn TextTranslator> {
        let backend = HttpBackend::new(&TranslatorConfig::new().with_api_url(url)).unwrap();
        let en = Language::from_code("en").unwrap();
        let hi = Language::from_code("hi").unwrap();
        backend.translator(&en, &hi).unwrap()
    }

    #[test]
    fn test_supported_pairs() {
        let backend = backend();
        let en = Language::from_code("en").unwrap();
        let hi = Language::from_code("hi").unwrap();
        let yo = Language::from_code("yo").unwrap();

        assert!(backend.translator(&en, &hi).is_some());
        assert!(backend.translator(&en, &en).is_none());
        assert!(backend.translator(&en, &yo).is_none());
    }

    #[test]
    fn test_indexed_text_roundtrip_markers() {
        let texts = vec!["Hello".to_string(), "Two\n  lines".to_string()];
        assert_eq!(build_indexed_text(&texts), "[0] Hello\n[1] Two lines");
    }

    #[test]
    fn test_parse_indexed_text_skips_noise() {
        let parsed = parse_indexed_text("[1] दो\nnoise\n [0] नमस्ते \n[2]   ").unwrap();
        assert_eq!(parsed, vec![(1, "दो".to_string()), (0, "नमस्ते".to_string())]);
    }

    #[test]
    fn test_merge_keeps_source_for_missing_items() {
        let texts = strings(&["Hello", "Two", "Three"]);
        let (merged, missing) = merge_indexed(&texts, vec![(2, "तीन".to_string()), (0, "नमस्ते".to_string())]);

        assert_eq!(merged, strings(&["नमस्ते", "Two", "तीन"]));
        assert_eq!(missing, 1);
    }

    #[test]
    fn test_merge_ignores_out_of_range_and_takes_last_duplicate() {
        let texts = strings(&["Hello", "Two"]);
        let indexed = vec![
            (0, "पहला".to_string()),
            (7, "बाहर".to_string()),
            (0, "नमस्ते".to_string()),
            (1, "दो".to_string()),
        ];

        let (merged, missing) = merge_indexed(&texts, indexed);

        assert_eq!(merged, strings(&["नमस्ते", "दो"]));
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_merge_with_empty_response() {
        let texts = strings(&["Hello"]);
        assert_eq!(merge_indexed(&texts, vec![]), (texts.clone(), 1));
    }

    #[test]
    fn test_batch_request_merges_partial_response() {
        let (url, server) = serve_once("200 OK", r#"{"code":200,"data":"[1] दो\n[9] x"}"#);

        let translated = translator_for(&url)
            .translate_batch(&strings(&["Hello", "Two"]))
            .unwrap();

        assert_eq!(translated, strings(&["Hello", "दो"]));
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /translate"));
        assert!(request.contains(r#""source_lang":"en""#));
        assert!(request.contains(r#""target_lang":"hi""#));
        assert!(request.contains(r#"[0] Hello\n[1] Two"#));
    }

    #[test]
    fn test_error_status_propagates() {
        let (url, server) = serve_once("500 Internal Server Error", "boom");

        let err = translator_for(&url)
            .translate_batch(&strings(&["Hello"]))
            .unwrap_err();

        server.join().unwrap();
        match err {
            TranslationError::TranslationApi { status_code, message, api_url } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "boom");
                assert_eq!(api_url, url);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_translated_text() {
        assert_eq!(extract_translated_text(r#"{"code":200,"data":"नमस्ते"}"#), "नमस्ते");
        assert_eq!(extract_translated_text(r#"{"result":"ok"}"#), "ok");
        assert_eq!(extract_translated_text("plain"), "plain");
    }
}
