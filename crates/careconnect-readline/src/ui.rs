//! Terminal presentation: colors per theme, strings per language.

use careconnect_core::preferences::{Language, Preferences, Theme};
use careconnect_core::transcript::{MessageRole, TranscriptEntry};
use colored::{Color, Colorize};

use crate::commands::QuickTopic;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub user: Color,
    pub bot: Color,
    pub error: Color,
    pub notice: Color,
    pub muted: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                user: Color::BrightGreen,
                bot: Color::BrightBlue,
                error: Color::BrightRed,
                notice: Color::BrightYellow,
                muted: Color::BrightBlack,
            },
            Theme::Light => Self {
                user: Color::Green,
                bot: Color::Blue,
                error: Color::Red,
                notice: Color::Magenta,
                muted: Color::BrightBlack,
            },
        }
    }
}

pub struct Texts {
    pub app_name: &'static str,
    pub tagline: &'static str,
    pub disclaimer: &'static str,
    pub auth_hint: &'static str,
    pub chat_hint: &'static str,
    pub goodbye: &'static str,
    /// First bot entry of the main view.
    pub welcome: &'static str,
    pub emergency: &'static str,
}

pub fn texts(language: Language) -> Texts {
    match language {
        Language::En => Texts {
            app_name: "CareConnect",
            tagline: "Connecting You to Better Health",
            disclaimer: "⚠️ This chatbot provides general health information only. Always consult healthcare professionals for medical diagnosis and treatment.",
            auth_hint: "Please /login, /register or continue as /guest.",
            chat_hint: "Ask me about health topics, or type /help.",
            goodbye: "Goodbye! Stay healthy. 💙",
            welcome: "Hello! 👋 I'm CareConnect, your AI health companion!\n\nI can help you with:\n✅ Disease information (COVID-19, Diabetes, TB, Malaria, Dengue, and more)\n✅ Symptoms and prevention tips\n✅ Health guidance and myth-busting\n✅ Emergency guidance\n\n⚠️ Remember: I provide general information only. For medical diagnosis or treatment, please consult healthcare professionals.\n\nWhat would you like to know about today?",
            emergency: "🚨 Emergency Helplines:\n\n• India Emergency: 112\n• Ambulance: 108\n• Police: 100\n• Fire: 101\n• Women Helpline: 1091\n• Child Helpline: 1098\n• Mental Health: 1800-599-0019",
        },
        Language::Hi => Texts {
            app_name: "केयरकनेक्ट",
            tagline: "आपको बेहतर स्वास्थ्य से जोड़ना",
            disclaimer: "⚠️ यह चैटबॉट केवल सामान्य स्वास्थ्य जानकारी प्रदान करता है। चिकित्सा निदान और उपचार के लिए हमेशा स्वास्थ्य पेशेवरों से परामर्श लें।",
            auth_hint: "कृपया /login, /register करें या /guest के रूप में जारी रखें।",
            chat_hint: "स्वास्थ्य विषयों के बारे में पूछें, या /help लिखें।",
            goodbye: "अलविदा! स्वस्थ रहें। 💙",
            welcome: "नमस्ते! 👋 मैं केयरकनेक्ट हूं, आपका एआई स्वास्थ्य साथी!\n\nमैं आपकी मदद कर सकता हूं:\n✅ रोग जानकारी (कोविड-19, मधुमेह, टीबी, मलेरिया, डेंगू, और अधिक)\n✅ लक्षण और रोकथाम सुझाव\n✅ स्वास्थ्य मार्गदर्शन और मिथक-बस्टिंग\n✅ आपातकालीन मार्गदर्शन\n\n⚠️ याद रखें: मैं केवल सामान्य जानकारी प्रदान करता हूं। चिकित्सा निदान या उपचार के लिए, कृपया स्वास्थ्य पेशेवरों से परामर्श लें।\n\nआज आप क्या जानना चाहेंगे?",
            emergency: "🚨 आपातकालीन हेल्पलाइन:\n\n• भारत आपातकाल: 112\n• एम्बुलेंस: 108\n• पुलिस: 100\n• अग्निशमन: 101\n• महिला हेल्पलाइन: 1091\n• बाल हेल्पलाइन: 1098\n• मानसिक स्वास्थ्य: 1800-599-0019",
        },
    }
}

/// The chat message sent for a preset topic.
pub fn quick_question(language: Language, topic: QuickTopic) -> &'static str {
    use QuickTopic::*;
    match (language, topic) {
        (Language::En, Covid) => "Tell me about COVID-19",
        (Language::En, Diabetes) => "Tell me about Diabetes",
        (Language::En, Tb) => "Tell me about Tuberculosis",
        (Language::En, Malaria) => "Tell me about Malaria",
        (Language::En, Dengue) => "Tell me about Dengue",
        (Language::En, Influenza) => "Tell me about Influenza",
        (Language::En, Hypertension) => "Tell me about Hypertension",
        (Language::En, Asthma) => "Tell me about Asthma",
        (Language::En, Typhoid) => "Tell me about Typhoid",
        (Language::En, Measles) => "Tell me about Measles",
        (Language::En, Pneumonia) => "Tell me about Pneumonia",
        (Language::En, Hepatitis) => "Tell me about Hepatitis",
        (Language::En, Chickenpox) => "Tell me about Chickenpox",
        (Language::Hi, Covid) => "मुझे कोविड-19 के बारे में बताएं",
        (Language::Hi, Diabetes) => "मुझे मधुमेह के बारे में बताएं",
        (Language::Hi, Tb) => "मुझे तपेदिक के बारे में बताएं",
        (Language::Hi, Malaria) => "मुझे मलेरिया के बारे में बताएं",
        (Language::Hi, Dengue) => "मुझे डेंगू के बारे में बताएं",
        (Language::Hi, Influenza) => "मुझे इन्फ्लूएंजा के बारे में बताएं",
        (Language::Hi, Hypertension) => "मुझे उच्च रक्तचाप के बारे में बताएं",
        (Language::Hi, Asthma) => "मुझे दमा के बारे में बताएं",
        (Language::Hi, Typhoid) => "मुझे टाइफाइड के बारे में बताएं",
        (Language::Hi, Measles) => "मुझे खसरा के बारे में बताएं",
        (Language::Hi, Pneumonia) => "मुझे निमोनिया के बारे में बताएं",
        (Language::Hi, Hepatitis) => "मुझे हेपेटाइटिस के बारे में बताएं",
        (Language::Hi, Chickenpox) => "मुझे चिकनपॉक्स के बारे में बताएं",
    }
}

pub fn print_banner(prefs: &Preferences) {
    let texts = texts(prefs.language);
    let palette = Palette::for_theme(prefs.theme);
    println!("{}", format!("=== 🏥 {} ===", texts.app_name).color(palette.notice).bold());
    println!("{}", texts.tagline.color(palette.muted));
    println!("{}", texts.disclaimer.color(palette.muted));
    println!();
}

pub fn print_entry(entry: &TranscriptEntry, palette: &Palette) {
    let (label, color) = match entry.role {
        MessageRole::User => ("You", palette.user),
        MessageRole::Bot if entry.is_error() => ("CareConnect", palette.error),
        MessageRole::Bot => ("CareConnect", palette.bot),
    };
    println!("{}", format!("[{label}]").color(color).bold());
    for line in entry.text.lines() {
        println!("{}", line.color(color));
    }
    println!();
}

pub fn print_notice(message: &str, palette: &Palette) {
    println!("{}", message.color(palette.notice));
}

pub fn print_error(message: &str, palette: &Palette) {
    eprintln!("{}", message.color(palette.error));
}

pub fn print_muted(message: &str, palette: &Palette) {
    println!("{}", message.color(palette.muted));
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_topic_has_both_languages() {
        for topic in QuickTopic::iter() {
            let en = quick_question(Language::En, topic);
            let hi = quick_question(Language::Hi, topic);
            assert!(en.starts_with("Tell me about"));
            assert_ne!(en, hi);
        }
    }

    #[test]
    fn test_helplines_match_across_languages() {
        for number in ["112", "108", "1098", "1800-599-0019"] {
            assert!(texts(Language::En).emergency.contains(number));
            assert!(texts(Language::Hi).emergency.contains(number));
        }
    }
}
