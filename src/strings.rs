//! User-facing text, one table per supported UI language.

use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    pub fn strings(self) -> Strings {
        match self {
            Locale::Ja => JA,
            Locale::En => EN,
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" | "japanese" => Ok(Locale::Ja),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            other => Err(anyhow::anyhow!("unsupported locale '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strings {
    pub cold_start: &'static str,
    pub generic_error: &'static str,
    pub network_error: &'static str,
    pub references: &'static str,
    pub empty_prompt: &'static str,
    pub input_placeholder: &'static str,
    pub send: &'static str,
    pub clear: &'static str,
    pub title: &'static str,
    pub avatar_alt: &'static str,
}

pub const JA: Strings = Strings {
    cold_start: "データベースが起動中です。30秒ほど時間を空けて再度質問を送信してください。",
    generic_error: "エラーが発生しました。しばらくしてからもう一度お試しください。",
    network_error: "ネットワークエラーが発生しました。インターネット接続を確認してください。",
    references: "参考資料:",
    empty_prompt: "何か質問してください...",
    input_placeholder: "質問を入力してください",
    send: "送信",
    clear: "会話をクリア",
    title: "ナレッジベースチャット",
    avatar_alt: "AI",
};

pub const EN: Strings = Strings {
    cold_start: "The database is starting up. Please wait about 30 seconds and send your question again.",
    generic_error: "An error occurred. Please try again later.",
    network_error: "A network error occurred. Please check your internet connection.",
    references: "References:",
    empty_prompt: "Ask me anything...",
    input_placeholder: "Type your question",
    send: "Send",
    clear: "Clear conversation",
    title: "Knowledge Base Chat",
    avatar_alt: "AI",
};
