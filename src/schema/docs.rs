// src/schema/docs.rs

/// Operator-facing meaning of each required column.
pub fn describe(column: &str) -> Option<&'static str> {
    let text = match column {
        "first_category_id" => "top-level product category",
        "second_category_id" => "second-level product category",
        "third_category_id" => "third-level product category",
        "discount" => "discount applied to the product, from 0 to 1",
        "holiday_flag" => "public holiday (0 = no, 1 = yes)",
        "activity_flag" => "promotion running (0 = no, 1 = yes)",
        "precpt" => "precipitation level",
        "avg_temperature" => "average temperature",
        "avg_humidity" => "average humidity",
        "avg_wind_level" => "average wind strength",
        "stock_hour6_22_cnt" => "hours out of stock between 6:00 and 22:00",
        "hours_sale_today" => "array of 24 hourly sales counts for today, e.g. [h1,h2,...]",
        "dow_tomorrow" => "tomorrow's day of week (1 = Monday, 2 = Tuesday, ...)",
        "month_tomorrow" => "tomorrow's month (1 = January, 2 = February, ...)",
        "is_weekend" => "tomorrow is a weekend day (0 = no, 1 = yes)",
        _ => return None,
    };
    Some(text)
}
