use chrono::DateTime;
use serde_json::Value;

use crate::constants::{FORECAST_ENTRY_LIMIT, USAGE_NOTICE};
use crate::models::{AirQuality, CurrentWeather, Forecast, TemperatureUnit};

/// Converts a kelvin reading into `unit`, one decimal place with suffix
pub fn format_temperature(kelvin: f64, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::Celsius => format!("{:.1}\u{00b0}C", round_tenths(kelvin - 273.15)),
        TemperatureUnit::Fahrenheit => format!(
            "{:.1}\u{00b0}F",
            round_tenths((kelvin - 273.15) * 9.0 / 5.0 + 32.0)
        ),
        TemperatureUnit::Kelvin => format!("{:.1}K", round_tenths(kelvin)),
    }
}

/// Half away from zero; adding 0.0 turns -0.0 into 0.0.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

fn format_timestamp(secs: i64, pattern: &str) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Formats a current weather payload into a human-readable string
pub fn format_weather_response(data: &Value, unit: TemperatureUnit) -> String {
    let Some(weather) = CurrentWeather::from_value(data) else {
        return "No weather data available.".to_string();
    };

    let mut output = format!(
        "Weather for {}\nTime: {} UTC\n\n",
        weather.name,
        format_timestamp(weather.dt, "%Y-%m-%d %H:%M:%S")
    );
    output.push_str(&format!(
        "Temperature: {}\n  Feels like: {}\n  Min: {} | Max: {}\n\n",
        format_temperature(weather.temp, unit),
        format_temperature(weather.feels_like, unit),
        format_temperature(weather.temp_min, unit),
        format_temperature(weather.temp_max, unit)
    ));
    output.push_str(&format!(
        "Condition: {} - {}\nHumidity: {}%\nPressure: {} hPa\nWind: {} m/s, direction {}\u{00b0}\nCloudiness: {}%\n",
        weather.condition.main,
        weather.condition.description,
        weather.humidity,
        weather.pressure,
        weather.wind_speed,
        weather.wind_deg,
        weather.cloudiness
    ));
    if let Some(rain) = weather.rain_1h {
        output.push_str(&format!("Rain (1h): {} mm\n", rain));
    }
    if let Some(snow) = weather.snow_1h {
        output.push_str(&format!("Snow (1h): {} mm\n", snow));
    }

    output.push('\n');
    output.push_str(USAGE_NOTICE);
    output
}

/// Formats the next 24 hours of a forecast payload into a human-readable string
pub fn format_forecast_response(data: &Value, unit: TemperatureUnit) -> String {
    let Some(forecast) = Forecast::from_value(data, FORECAST_ENTRY_LIMIT) else {
        return "No forecast data available.".to_string();
    };

    let mut output = format!(
        "Weather Forecast for {}\nCoordinates: {}, {}\n\n",
        forecast.city_name, forecast.latitude, forecast.longitude
    );

    for entry in &forecast.entries {
        output.push_str(&format!(
            "{} UTC:\n  Temperature: {} (feels like {})\n  Conditions: {} - {}\n  Humidity: {}% | Wind: {} m/s\n  Rain probability: {:.1}%\n\n",
            format_timestamp(entry.dt, "%Y-%m-%d %H:%M"),
            format_temperature(entry.temp, unit),
            format_temperature(entry.feels_like, unit),
            entry.condition.main,
            entry.condition.description,
            entry.humidity,
            entry.wind_speed,
            round_tenths(entry.pop * 100.0)
        ));
    }

    output.push_str(USAGE_NOTICE);
    output
}

/// Formats an air pollution payload into a human-readable string
pub fn format_air_quality_response(data: &Value) -> String {
    let Some(air) = AirQuality::from_value(data) else {
        return "No air quality data available.".to_string();
    };

    let c = &air.components;
    format!(
        "Air Quality Index (AQI): {} - {}\nTime: {} UTC\n\n\
         Components (\u{03bc}g/m\u{00b3}):\n\
         \x20 CO (Carbon monoxide): {:.2}\n\
         \x20 NO (Nitrogen monoxide): {:.2}\n\
         \x20 NO\u{2082} (Nitrogen dioxide): {:.2}\n\
         \x20 O\u{2083} (Ozone): {:.2}\n\
         \x20 SO\u{2082} (Sulphur dioxide): {:.2}\n\
         \x20 PM2.5 (Fine particles): {:.2}\n\
         \x20 PM10 (Coarse particles): {:.2}\n\
         \x20 NH\u{2083} (Ammonia): {:.2}\n\n{}",
        air.aqi,
        aqi_label(air.aqi),
        format_timestamp(air.dt, "%Y-%m-%d %H:%M:%S"),
        c.co,
        c.no,
        c.no2,
        c.o3,
        c.so2,
        c.pm2_5,
        c.pm10,
        c.nh3,
        USAGE_NOTICE
    )
}

/// Maps the 1-5 OpenWeatherMap AQI scale to its label
fn aqi_label(aqi: i64) -> &'static str {
    match aqi {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}
