//! Rule-based weather assistant.
//!
//! A message is classified into an [`Intent`] by scanning an ordered keyword
//! table; the first intent with a keyword contained in the lower-cased
//! message wins. Each intent renders a templated reply from the supplied
//! [`AssistantWeather`] snapshot. There is no conversational state.

use std::fmt::Write;

use serde::Deserialize;

use crate::weather::CurrentConditions;

/// Reply used when the caller has not loaded any weather data yet.
pub const NO_WEATHER_REPLY: &str =
    "I need weather data to help you properly. Please load weather information for your location first!";

/// Weather fields the assistant reads. Deserialized from the dashboard's
/// `weatherData` object, so unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantWeather {
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: Option<f64>,
    pub aqi: Option<f64>,
}

impl From<&CurrentConditions> for AssistantWeather {
    fn from(current: &CurrentConditions) -> Self {
        Self {
            location: current.location.clone(),
            temperature: f64::from(current.temperature),
            feels_like: f64::from(current.feels_like),
            description: current.description.clone(),
            humidity: f64::from(current.humidity),
            wind_speed: f64::from(current.wind_speed),
            pressure: Some(f64::from(current.pressure)),
            aqi: current.aqi.map(f64::from),
        }
    }
}

/// What the user is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Clothing,
    Activity,
    Umbrella,
    AirQuality,
    Driving,
    Temperature,
    Wind,
    Humidity,
    Weather,
    Help,
}

/// Keyword table in priority order.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Clothing, &["wear", "clothes", "outfit", "dress"]),
    (Intent::Activity, &["activity", "activities", "outdoor", "do"]),
    (Intent::Umbrella, &["umbrella", "rain"]),
    (Intent::AirQuality, &["air", "quality", "health"]),
    (Intent::Driving, &["drive", "driving", "car"]),
    (Intent::Temperature, &["temperature", "temp", "hot", "cold"]),
    (Intent::Wind, &["wind"]),
    (Intent::Humidity, &["humidity"]),
    (Intent::Weather, &["weather"]),
];

impl Intent {
    /// Classify a free-text message. Matching is case-insensitive substring
    /// search, so `"do"` also matches inside longer words.
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        INTENT_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| message.contains(k)))
            .map_or(Intent::Help, |(intent, _)| *intent)
    }
}

/// Produce the assistant's reply to `message`.
pub fn respond(message: &str, weather: Option<&AssistantWeather>) -> String {
    let Some(weather) = weather else {
        return NO_WEATHER_REPLY.to_string();
    };
    let ctx = Context::new(weather);

    match Intent::classify(message) {
        Intent::Clothing => clothing(&ctx),
        Intent::Activity => activities(&ctx),
        Intent::Umbrella => umbrella(&ctx),
        Intent::AirQuality => air_quality(&ctx),
        Intent::Driving => driving(&ctx),
        Intent::Temperature => temperature(&ctx),
        Intent::Wind => wind(&ctx),
        Intent::Humidity => humidity(&ctx),
        Intent::Weather => summary(&ctx),
        Intent::Help => help(&ctx),
    }
}

/// Snapshot plus the lower-cased description most rules test against.
struct Context<'a> {
    w: &'a AssistantWeather,
    desc: String,
}

impl<'a> Context<'a> {
    fn new(w: &'a AssistantWeather) -> Self {
        Self {
            w,
            desc: w.description.to_lowercase(),
        }
    }

    fn desc_has(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.desc.contains(n))
    }
}

fn clothing(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let temp = w.temperature;
    let mut out = format!("👔 **Clothing Recommendation for {}:**\n\n", w.location);

    let band = if temp <= 0.0 {
        format!("🧥 **Very Cold ({temp}°C)**: Heavy winter coat, thermal layers, warm hat, gloves, and insulated boots. Stay warm!")
    } else if temp <= 10.0 {
        format!("🧥 **Cold ({temp}°C)**: Warm jacket or coat, long pants, closed shoes, and consider a scarf. Layer up!")
    } else if temp <= 15.0 {
        format!("🧥 **Cool ({temp}°C)**: Light jacket or sweater, long pants, and comfortable shoes. Perfect for layering!")
    } else if temp <= 20.0 {
        format!("👕 **Mild ({temp}°C)**: Light sweater or long-sleeve shirt, jeans or pants. Very comfortable weather!")
    } else if temp <= 25.0 {
        format!("👕 **Pleasant ({temp}°C)**: T-shirt or light shirt, comfortable pants or shorts. Great weather!")
    } else if temp <= 30.0 {
        format!("👕 **Warm ({temp}°C)**: Light, breathable clothing, shorts or light pants, sandals or breathable shoes.")
    } else {
        format!("🌡️ **Hot ({temp}°C)**: Very light, loose-fitting clothes, shorts, tank tops, sun hat, and stay hydrated!")
    };
    out.push_str(&band);

    if ctx.desc_has(&["rain", "drizzle"]) {
        out.push_str("\n☔ **Rain Alert**: Don't forget an umbrella or raincoat!");
    }
    if ctx.desc_has(&["snow"]) {
        out.push_str("\n❄️ **Snow Alert**: Wear waterproof boots and warm layers!");
    }
    if w.wind_speed > 15.0 {
        out.push_str("\n💨 **Windy**: Consider a windbreaker or jacket to stay comfortable.");
    }
    if w.humidity > 80.0 {
        out.push_str("\n💧 **High Humidity**: Choose breathable, moisture-wicking fabrics.");
    }
    out
}

fn activities(ctx: &Context<'_>) -> String {
    let temp = ctx.w.temperature;
    let mut out = format!("🎯 **Activity Suggestions for {}:**\n\n", ctx.w.location);

    let list = if (20.0..=28.0).contains(&temp) && !ctx.desc_has(&["rain", "storm"]) {
        "Perfect weather for outdoor activities! 🌞\n• Walking or hiking\n• Picnics in the park\n• Outdoor sports\n• Cycling\n• Photography"
    } else if ctx.desc_has(&["rain"]) {
        "Rainy day activities: 🌧️\n• Indoor museums or galleries\n• Shopping centers\n• Cozy cafes\n• Reading at home\n• Indoor fitness"
    } else if temp < 10.0 {
        "Cold weather activities: ❄️\n• Indoor activities recommended\n• Hot drinks at cafes\n• Museums or libraries\n• Indoor sports\n• Cooking at home"
    } else {
        "Good for moderate outdoor activities: 🌤️\n• Light walking\n• Indoor/outdoor mix\n• Shopping\n• Casual outdoor dining"
    };
    out.push_str(list);
    out
}

fn umbrella(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    if ctx.desc_has(&["rain", "drizzle", "shower"]) {
        format!(
            "☔ **Yes, bring an umbrella!** It's {} in {}. Better to be prepared!",
            ctx.desc, w.location
        )
    } else if w.humidity > 85.0 {
        format!(
            "🌫️ **Maybe bring an umbrella.** High humidity ({}%) suggests possible rain later.",
            w.humidity
        )
    } else {
        format!(
            "☀️ **No umbrella needed!** Clear weather in {} with {}.",
            w.location, ctx.desc
        )
    }
}

fn air_quality(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let mut out = format!("🌬️ **Air Quality Info for {}:**\n\n", w.location);
    if let Some(aqi) = w.aqi.filter(|a| *a != 0.0) {
        let _ = writeln!(out, "Air Quality Index: {aqi}");
    }
    let _ = writeln!(
        out,
        "Current conditions: {} with {}% humidity.",
        ctx.desc, w.humidity
    );
    if w.humidity > 80.0 {
        out.push_str("High humidity may affect those with respiratory conditions.");
    } else {
        out.push_str("Generally good conditions for outdoor activities.");
    }
    out
}

fn driving(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let mut out = format!("🚗 **Driving Conditions in {}:**\n\n", w.location);
    if ctx.desc_has(&["rain", "drizzle"]) {
        let _ = write!(
            out,
            "⚠️ **Caution**: Wet roads due to {}. Drive slowly and increase following distance.",
            ctx.desc
        );
    } else if ctx.desc_has(&["fog", "mist"]) {
        out.push_str("⚠️ **Low Visibility**: Foggy conditions. Use headlights and drive carefully.");
    } else if ctx.desc_has(&["snow", "ice"]) {
        out.push_str("❄️ **Dangerous**: Icy/snowy conditions. Consider avoiding travel or use winter tires.");
    } else if w.wind_speed > 25.0 {
        let _ = write!(
            out,
            "💨 **Windy**: Strong winds ({} m/s). Be careful with high-profile vehicles.",
            w.wind_speed
        );
    } else {
        let _ = write!(out, "✅ **Good**: Clear driving conditions with {}.", ctx.desc);
    }
    out
}

fn temperature(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let mut out = format!(
        "🌡️ **Temperature in {}**: {}°C (feels like {}°C)\n\n",
        w.location, w.temperature, w.feels_like
    );
    if w.temperature != w.feels_like {
        out.push_str(
            "The \"feels like\" temperature is different due to humidity and wind conditions.",
        );
    }
    out
}

fn wind(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let speed = w.wind_speed;
    let verdict = if speed < 5.0 {
        "Light breeze - very pleasant!"
    } else if speed < 15.0 {
        "Moderate wind - comfortable for most activities."
    } else if speed < 25.0 {
        "Strong wind - secure loose items and dress appropriately."
    } else {
        "Very strong wind - be cautious outdoors!"
    };
    format!(
        "💨 **Wind Conditions**: {speed} m/s in {}\n\n{verdict}",
        w.location
    )
}

fn humidity(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let humidity = w.humidity;
    let verdict = if humidity < 30.0 {
        "Low humidity - you might feel dry. Stay hydrated!"
    } else if humidity < 60.0 {
        "Comfortable humidity levels."
    } else if humidity < 80.0 {
        "Moderate humidity - might feel a bit muggy."
    } else {
        "High humidity - expect it to feel quite muggy and sticky."
    };
    format!("💧 **Humidity**: {humidity}% in {}\n\n{verdict}", w.location)
}

fn summary(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let mut out = format!("🌤️ **Current Weather in {}:**\n\n", w.location);
    let _ = writeln!(
        out,
        "• Temperature: {}°C (feels like {}°C)",
        w.temperature, w.feels_like
    );
    let _ = writeln!(out, "• Conditions: {}", w.description);
    let _ = writeln!(out, "• Humidity: {}%", w.humidity);
    let _ = writeln!(out, "• Wind: {} m/s", w.wind_speed);
    match w.pressure {
        Some(p) => {
            let _ = write!(out, "• Pressure: {p} hPa");
        }
        None => out.push_str("• Pressure: unknown"),
    }
    out
}

fn help(ctx: &Context<'_>) -> String {
    let w = ctx.w;
    let mut out = String::from("🤖 **Weather Assistant**: I can help you with:\n\n");
    out.push_str("• **Clothing advice** - \"What should I wear?\"\n");
    out.push_str("• **Activity suggestions** - \"What can I do outside?\"\n");
    out.push_str("• **Rain/umbrella advice** - \"Should I bring an umbrella?\"\n");
    out.push_str("• **Driving conditions** - \"Is it safe to drive?\"\n");
    out.push_str("• **Current weather** - Ask about temperature, humidity, wind\n\n");
    let _ = write!(
        out,
        "Current conditions: {}, {}°C in {}. What would you like to know?",
        ctx.desc, w.temperature, w.location
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AssistantWeather {
        AssistantWeather {
            location: "Oslo, NO".to_string(),
            temperature: 12.0,
            feels_like: 10.0,
            description: "Scattered Clouds".to_string(),
            humidity: 60.0,
            wind_speed: 5.0,
            pressure: Some(1012.0),
            aqi: None,
        }
    }

    #[test]
    fn missing_weather_returns_fixed_reply() {
        assert_eq!(respond("what should I wear?", None), NO_WEATHER_REPLY);
    }

    #[test]
    fn classification_is_first_match_wins() {
        // "wear" beats "rain" because clothing is checked first.
        assert_eq!(Intent::classify("What to wear in the rain?"), Intent::Clothing);
        assert_eq!(Intent::classify("Should I bring an UMBRELLA?"), Intent::Umbrella);
        assert_eq!(Intent::classify("Is it safe to drive?"), Intent::Driving);
        assert_eq!(Intent::classify("how hot is it"), Intent::Temperature);
        assert_eq!(Intent::classify("wind?"), Intent::Wind);
        assert_eq!(Intent::classify("humidity please"), Intent::Humidity);
        assert_eq!(Intent::classify("weather report"), Intent::Weather);
        assert_eq!(Intent::classify("hello"), Intent::Help);
    }

    #[test]
    fn do_substring_routes_to_activities() {
        // "window" contains "do", so it is treated as an activity question.
        assert_eq!(Intent::classify("open the window?"), Intent::Activity);
    }

    #[test]
    fn clothing_includes_windbreaker_when_windy() {
        let mut w = snapshot();
        w.wind_speed = 16.0;
        let reply = respond("What should I wear today?", Some(&w));
        assert!(reply.contains("Clothing Recommendation for Oslo, NO"));
        assert!(reply.contains("**Cool (12°C)**"));
        assert!(reply.contains("windbreaker"));
    }

    #[test]
    fn clothing_adds_rain_snow_and_humidity_lines() {
        let mut w = snapshot();
        w.temperature = -3.0;
        w.description = "light rain and snow".to_string();
        w.humidity = 90.0;
        let reply = respond("outfit?", Some(&w));
        assert!(reply.contains("**Very Cold (-3°C)**"));
        assert!(reply.contains("Rain Alert"));
        assert!(reply.contains("Snow Alert"));
        assert!(reply.contains("moisture-wicking"));
        assert!(!reply.contains("windbreaker"));
    }

    #[test]
    fn clothing_band_boundaries() {
        let mut w = snapshot();
        for (temp, label) in [
            (10.0, "Cold"),
            (20.0, "Mild"),
            (25.0, "Pleasant"),
            (30.0, "Warm"),
            (31.0, "Hot"),
        ] {
            w.temperature = temp;
            let reply = respond("wear", Some(&w));
            assert!(reply.contains(&format!("**{label} ({temp}°C)**")), "{reply}");
        }
    }

    #[test]
    fn activities_prefer_outdoor_in_pleasant_dry_weather() {
        let mut w = snapshot();
        w.temperature = 24.0;
        let reply = respond("any outdoor activities?", Some(&w));
        assert!(reply.contains("Perfect weather for outdoor activities"));

        w.description = "thunderstorm".to_string();
        let reply = respond("any outdoor activities?", Some(&w));
        assert!(reply.contains("Good for moderate outdoor activities"));
    }

    #[test]
    fn activities_in_rain_and_cold() {
        let mut w = snapshot();
        w.description = "moderate rain".to_string();
        assert!(respond("what can I do", Some(&w)).contains("Rainy day activities"));

        w.description = "clear sky".to_string();
        w.temperature = 4.0;
        assert!(respond("what can I do", Some(&w)).contains("Cold weather activities"));
    }

    #[test]
    fn umbrella_advice() {
        let mut w = snapshot();
        w.description = "Light Drizzle".to_string();
        let reply = respond("umbrella?", Some(&w));
        assert!(reply.starts_with("☔ **Yes, bring an umbrella!** It's light drizzle in Oslo, NO."));

        w.description = "overcast clouds".to_string();
        w.humidity = 90.0;
        assert!(respond("umbrella?", Some(&w)).contains("High humidity (90%)"));

        w.humidity = 40.0;
        assert!(respond("umbrella?", Some(&w)).contains("No umbrella needed!"));
    }

    #[test]
    fn air_quality_mentions_aqi_when_present() {
        let mut w = snapshot();
        w.aqi = Some(2.0);
        let reply = respond("how is the air", Some(&w));
        assert!(reply.contains("Air Quality Index: 2\n"));
        assert!(reply.contains("Generally good conditions"));

        w.aqi = None;
        w.humidity = 85.0;
        let reply = respond("health check", Some(&w));
        assert!(!reply.contains("Air Quality Index"));
        assert!(reply.contains("respiratory"));
    }

    #[test]
    fn driving_conditions_priority() {
        let mut w = snapshot();
        w.description = "mist".to_string();
        assert!(respond("drive", Some(&w)).contains("Low Visibility"));

        w.description = "snow".to_string();
        assert!(respond("drive", Some(&w)).contains("Dangerous"));

        w.description = "clear sky".to_string();
        w.wind_speed = 30.0;
        assert!(respond("drive", Some(&w)).contains("Strong winds (30 m/s)"));

        w.wind_speed = 3.0;
        assert!(respond("drive", Some(&w)).contains("Clear driving conditions with clear sky"));
    }

    #[test]
    fn temperature_explains_feels_like_difference() {
        let mut w = snapshot();
        let reply = respond("temperature?", Some(&w));
        assert!(reply.contains("12°C (feels like 10°C)"));
        assert!(reply.contains("\"feels like\" temperature is different"));

        w.feels_like = 12.0;
        assert!(!respond("temperature?", Some(&w)).contains("is different"));
    }

    #[test]
    fn wind_and_humidity_bands() {
        let mut w = snapshot();
        w.wind_speed = 20.0;
        assert!(respond("wind", Some(&w)).contains("Strong wind"));
        w.humidity = 20.0;
        assert!(respond("humidity", Some(&w)).contains("Low humidity"));
        w.humidity = 75.0;
        assert!(respond("humidity", Some(&w)).contains("Moderate humidity"));
    }

    #[test]
    fn weather_summary_lists_pressure() {
        let reply = respond("weather", Some(&snapshot()));
        assert!(reply.contains("• Conditions: Scattered Clouds"));
        assert!(reply.ends_with("• Pressure: 1012 hPa"));
    }

    #[test]
    fn help_lists_capabilities_and_conditions() {
        let reply = respond("hi there", Some(&snapshot()));
        assert!(reply.starts_with("🤖 **Weather Assistant**"));
        assert!(reply.contains("Current conditions: scattered clouds, 12°C in Oslo, NO."));
    }

    #[test]
    fn deserializes_dashboard_payload() {
        let w: AssistantWeather = serde_json::from_value(serde_json::json!({
            "location": "Lima, PE",
            "temperature": 19,
            "feelsLike": 18,
            "description": "haze",
            "humidity": 77,
            "windSpeed": 11,
            "extra": "ignored"
        }))
        .unwrap();
        assert_eq!(w.feels_like, 18.0);
        assert_eq!(w.wind_speed, 11.0);
        assert_eq!(w.pressure, None);
    }
}
