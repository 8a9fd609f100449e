//! Short advice lines attached to the current conditions.

/// Maximum number of suggestions returned to the dashboard.
pub const MAX_SUGGESTIONS: usize = 3;

/// Raw readings the suggestion rules look at.
#[derive(Debug, Clone)]
pub struct SuggestionInput<'a> {
    /// Degrees Celsius, unrounded.
    pub temperature: f64,
    pub humidity: i32,
    /// Kilometres per hour.
    pub wind_speed_kmh: f64,
    /// Provider's condition group (`Rain`, `Snow`, `Clear`, ...).
    pub condition: &'a str,
    pub aqi: Option<u8>,
}

/// Build up to [`MAX_SUGGESTIONS`] advice lines, most important first.
pub fn generate_suggestions(input: &SuggestionInput<'_>) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();
    let temp = input.temperature;
    let condition = input.condition.to_lowercase();
    let is_raining = condition.contains("rain");
    let is_snowing = condition.contains("snow");

    if temp < 0.0 {
        out.push("🧥 Bundle up! It's freezing outside");
        out.push("❄️ Watch out for icy conditions");
    } else if temp < 10.0 {
        out.push("🧥 Wear a warm jacket");
    } else if temp < 20.0 {
        out.push("👕 Light jacket recommended");
    } else if temp > 30.0 {
        out.push("☀️ Stay hydrated and seek shade");
        out.push("👒 Wear sunscreen and a hat");
    }

    if is_raining {
        out.push("☂️ Don't forget your umbrella!");
        out.push("👟 Wear waterproof shoes");
    }
    if is_snowing {
        out.push("❄️ Drive carefully - roads may be slippery");
        out.push("🧤 Wear gloves and warm boots");
    }
    if input.wind_speed_kmh > 20.0 {
        out.push("💨 It's quite windy - secure loose items");
    }
    if input.humidity > 80 {
        out.push("💧 High humidity - expect it to feel warmer");
    }
    if input.aqi.is_some_and(|aqi| aqi >= 4) {
        out.push("😷 Poor air quality - consider wearing a mask");
        out.push("🏠 Limit outdoor activities");
    }
    if !is_raining
        && !is_snowing
        && (15.0..=25.0).contains(&temp)
        && input.wind_speed_kmh < 15.0
    {
        out.push("🚶‍♂️ Great weather for a walk!");
    }
    if temp >= 20.0 && !is_raining {
        out.push("☀️ Perfect weather for outdoor activities");
    }

    out.into_iter()
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}
