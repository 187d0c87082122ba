//! DemoBackend - offline stand-in for the REST backend.
//!
//! Answers chat messages from a static keyword table, accepts any
//! credentials, and acknowledges uploads with canned text. Used with
//! `--demo` or `demo_mode = true`.

use async_trait::async_trait;
use careconnect_core::backend::{
    BackendApi, BackendError, ChatRequest, ChatResponse, HealthStatus, LoginRequest,
    LoginResponse, RegisterRequest, UploadKind, UploadRequest, UploadResponse,
};
use careconnect_core::session::User;
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

/// Checked in order; the first keyword contained in the message wins.
const TOPICS: &[(&str, &str)] = &[
    (
        "cold",
        "🤧 Common cold symptoms include:\n\n• Runny or stuffy nose\n• Sore throat\n• Cough\n• Mild fever\n• Fatigue\n• Sneezing\n\nTreatment tips:\n✓ Rest and stay hydrated\n✓ Drink warm fluids (tea, soup)\n✓ Use over-the-counter medications if needed\n✓ Get plenty of sleep\n\n⚠️ Consult a doctor if symptoms persist beyond 10 days or worsen.",
    ),
    (
        "stress",
        "😌 Here are effective ways to reduce stress:\n\n1. Deep Breathing: Practice 4-7-8 breathing technique\n2. Exercise: 30 minutes daily of moderate activity\n3. Sleep: Maintain 7-8 hours per night\n4. Meditation: Try mindfulness for 10 minutes daily\n5. Social Connection: Talk to friends and family\n6. Time Management: Prioritize tasks and take breaks\n7. Hobbies: Engage in activities you enjoy\n\n💙 Remember: It's okay to seek professional help if stress becomes overwhelming.",
    ),
    (
        "diet",
        "🥗 Healthy Diet Tips:\n\nWhat to Include:\n✓ Colorful fruits and vegetables (5+ servings daily)\n✓ Whole grains (brown rice, quinoa, oats)\n✓ Lean proteins (fish, chicken, legumes)\n✓ Healthy fats (nuts, avocado, olive oil)\n✓ 8-10 glasses of water\n\nWhat to Limit:\n✗ Processed foods\n✗ Added sugars\n✗ Excessive salt\n✗ Trans fats\n✗ Alcohol\n\n💡 Eat regular, balanced meals and practice portion control!",
    ),
    (
        "exercise",
        "💪 Exercise Recommendations:\n\nCardio (150 min/week):\n• Brisk walking\n• Jogging\n• Cycling\n• Swimming\n\nStrength Training (2x/week):\n• Weight lifting\n• Resistance bands\n• Bodyweight exercises\n• Yoga\n\nTips for Success:\n✓ Start slowly and build up\n✓ Find activities you enjoy\n✓ Stay consistent\n✓ Listen to your body\n\n🏃 Always consult a doctor before starting a new exercise program!",
    ),
    (
        "sleep",
        "😴 Better Sleep Tips:\n\nBedtime Routine:\n• Go to bed at the same time daily\n• Avoid screens 1 hour before bed\n• Keep the bedroom cool and dark\n\nDiet & Lifestyle:\n• Limit caffeine after 2 PM\n• Avoid heavy meals before bed\n• Get natural sunlight during the day\n\nIf You Can't Sleep:\n• Get up and do a quiet activity\n• Try progressive muscle relaxation\n\n💤 Aim for 7-9 hours of quality sleep!",
    ),
    (
        "headache",
        "🧠 Headache Relief:\n\nImmediate Relief:\n• Rest in a quiet, dark room\n• Apply a cold or warm compress\n• Stay hydrated\n• Gentle neck stretches\n\nPrevention:\n• Regular sleep schedule\n• Limit screen time\n• Maintain good posture\n\n⚠️ Seek medical attention for a sudden severe headache, a headache with fever or stiff neck, or one after a head injury.",
    ),
    (
        "diabetes",
        "🩺 Diabetes Management:\n\nBlood Sugar Control:\n• Monitor levels regularly\n• Follow prescribed medication\n• Eat balanced meals\n• Limit refined sugars\n\nHealthy Lifestyle:\n• Exercise 150 minutes/week\n• Maintain a healthy weight\n• Get adequate sleep\n\nRegular Check-ups:\n• A1C tests every 3-6 months\n• Eye exams annually\n• Foot checks\n\n💙 Work closely with your healthcare team for personalized care!",
    ),
    (
        "anxiety",
        "💙 Managing Anxiety:\n\nImmediate Techniques:\n1. Deep breathing (4-4-4 method)\n2. Grounding exercises (5-4-3-2-1)\n3. Progressive muscle relaxation\n\nLong-term Strategies:\n• Regular exercise\n• Adequate sleep\n• Limit caffeine & alcohol\n• Mindfulness meditation\n\nWhen to Seek Help:\n• Anxiety interferes with daily life\n• Panic attacks\n\n🌟 Seeking professional help is a sign of strength, not weakness!",
    ),
    (
        "heart",
        "❤️ Heart Health Tips:\n\nExercise:\n• 150 min moderate activity/week\n• Stay active throughout the day\n\nDiet:\n• Fruits & vegetables\n• Whole grains\n• Limit sodium & saturated fats\n\nLifestyle:\n• Don't smoke\n• Manage stress\n• Get 7-9 hours sleep\n\nRegular Monitoring:\n• Blood pressure\n• Cholesterol\n\n💪 Small changes can make a big difference for your heart!",
    ),
];

static GREETING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(hi|hello|hey|greetings)\b").expect("valid greeting pattern"));

static THANKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(thank|thanks|appreciate)\b").expect("valid thanks pattern"));

const THANKS_REPLY: &str = "You're very welcome! 😊 I'm here 24/7 to help with your health questions. Is there anything else you'd like to know?";

const HELP_REPLY: &str = "I'm here to help with your health questions! You can ask me about:\n\n• Symptoms and conditions\n• Diet and nutrition\n• Exercise and fitness\n• Stress management\n• Sleep problems\n• Finding healthcare providers\n\nWhat would you like to know? 💙";

/// Offline backend with optional simulated latency.
pub struct DemoBackend {
    latency: Duration,
    last_name: Mutex<Option<String>>,
}

impl DemoBackend {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            last_name: Mutex::new(None),
        }
    }

    /// Delays every response, so the busy indicator is visible.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The canned answer for `message`.
    pub fn reply_to(&self, message: &str) -> String {
        let lower = message.to_lowercase();

        if let Some((_, reply)) = TOPICS.iter().find(|(keyword, _)| lower.contains(keyword)) {
            return (*reply).to_string();
        }

        if GREETING.is_match(&lower) {
            let name = self
                .last_name
                .lock()
                .clone()
                .unwrap_or_else(|| "there".to_string());
            return format!(
                "Hello {name}! 👋 How can I help you today? I can assist with:\n\n• Health symptoms and conditions\n• Diet and nutrition advice\n• Exercise recommendations\n• Stress and mental health\n\nWhat would you like to know?"
            );
        }

        if THANKS.is_match(&lower) {
            return THANKS_REPLY.to_string();
        }

        HELP_REPLY.to_string()
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Local part of the address, or the whole input if there is no `@`.
fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[async_trait]
impl BackendApi for DemoBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        self.pause().await;
        let now = Utc::now().timestamp_millis();
        let name = name_from_email(&request.email);
        *self.last_name.lock() = Some(name.clone());
        debug!(email = %request.email, "demo login");
        Ok(LoginResponse {
            user: User::new(now.to_string(), name, request.email.clone()),
            token: format!("demo_token_{now}"),
            session_id: None,
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, BackendError> {
        self.pause().await;
        debug!(email = %request.email, "demo registration");
        Ok(serde_json::json!({ "message": "User registered successfully" }))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.pause().await;
        Ok(ChatResponse::text(self.reply_to(&request.message)))
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError> {
        self.pause().await;
        let name = &request.file.file_name;
        let analysis = match request.kind {
            UploadKind::Image => format!(
                "📷 Image \"{name}\" received!\n\nFor an accurate diagnosis from images, please consult a healthcare professional who can examine the image and your symptoms.\n\nI can provide general health information. What would you like to know?"
            ),
            UploadKind::Document => format!(
                "📄 Document \"{name}\" received!\n\nFor a detailed interpretation of medical reports and test results, please consult your doctor.\n\nI can answer general questions about medical terminology. How can I help?"
            ),
        };
        Ok(UploadResponse {
            analysis: Some(analysis),
        })
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            message: Some("Demo mode (offline)".to_string()),
            version: None,
        })
    }
}
