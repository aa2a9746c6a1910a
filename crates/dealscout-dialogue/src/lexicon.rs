//! Hebrew/English shopping vocabulary and substring matchers.
//!
//! Matching is case-insensitive substring containment over the whole
//! utterance. The tables are ordered slices so that lookups are
//! deterministic: the first listed entry that appears in the text wins.

/// Known brand and product-line names, Hebrew and Latin spellings.
pub const BRANDS: &[&str] = &[
    "אייפון",
    "iphone",
    "סמסונג",
    "samsung",
    "galaxy",
    "גלקסי",
    "שיאומי",
    "xiaomi",
    "redmi",
    "poco",
    "וואווי",
    "huawei",
    "sony",
    "סוני",
    "jbl",
    "bose",
    "apple",
    "אפל",
    "lg",
    "אל ג'י",
    "lenovo",
    "לנובו",
    "dell",
    "דל",
    "asus",
    "אסוס",
    "hp",
    "acer",
    "איסר",
    "dyson",
    "דייסון",
    "philips",
    "פיליפס",
    "bosch",
    "בוש",
    "nikon",
    "ניקון",
    "canon",
    "קנון",
    "gopro",
    "nintendo",
    "נינטנדו",
    "playstation",
    "ps5",
    "xbox",
    "airpods",
    "אירפודס",
    "macbook",
    "מקבוק",
    "ipad",
    "אייפד",
];

/// Generic product categories that open a guided slot-filling dialogue.
pub const GENERIC_CATEGORIES: &[&str] = &[
    "טלפון",
    "פלאפון",
    "נייד",
    "סלולרי",
    "אוזניות",
    "אוזניה",
    "רמקול",
    "רמקולים",
    "טלוויזיה",
    "טלויזיה",
    "מסך",
    "מחשב",
    "לפטופ",
    "מקרר",
    "מכונת כביסה",
    "מדיח",
    "מייבש",
    "תנור",
    "מיקרוגל",
    "שואב אבק",
    "מזגן",
    "מאוורר",
    "מצלמה",
    "שעון חכם",
    "טאבלט",
    "קונסולה",
    "משחק",
    "אופניים",
    "קורקינט",
];

/// Israeli cities and delivery regions.
pub const CITIES: &[&str] = &[
    "תל אביב",
    "ירושלים",
    "חיפה",
    "באר שבע",
    "אשדוד",
    "אשקלון",
    "נתניה",
    "חולון",
    "בת ים",
    "רמת גן",
    "פתח תקווה",
    "ראשון לציון",
    "הרצליה",
    "רעננה",
    "כפר סבא",
    "הוד השרון",
    "רחובות",
    "נס ציונה",
    "לוד",
    "רמלה",
    "מודיעין",
    "עפולה",
    "נצרת",
    "טבריה",
    "אילת",
    "קריית שמונה",
    "קריית גת",
    "דימונה",
    "ערד",
    "צפת",
    "מרכז",
    "צפון",
    "דרום",
    "שרון",
    "גוש דן",
    "שפלה",
    "נגב",
];

/// Model-tier words that mark a branded mention as a concrete item.
pub const MODEL_QUALIFIERS: &[&str] = &["פרו", "pro", "max", "ultra", "plus", "lite", "mini"];

/// Common Hebrew greetings.
pub const GREETINGS: &[&str] = &[
    "היי",
    "הי",
    "שלום",
    "בוקר טוב",
    "ערב טוב",
    "מה נשמע",
    "מה קורה",
    "אהלן",
];

/// Topics the assistant refuses to discuss.
pub const OFF_TOPIC: &[&str] = &[
    "פוליטיקה",
    "ממשלה",
    "דת",
    "אלוהים",
    "בחירות",
    "מלחמה",
    "כדורגל",
];

/// Price and budget talk.
pub const PRICE_WORDS: &[&str] = &[
    "יקר",
    "זול",
    "מחיר",
    "עולה",
    "עולות",
    "עולים",
    "תקציב",
    "כסף",
];

fn find_in(table: &'static [&'static str], text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    table.iter().find(|entry| lower.contains(*entry)).copied()
}

/// First brand mentioned in the text, if any.
pub fn find_brand(text: &str) -> Option<&'static str> {
    find_in(BRANDS, text)
}

/// First generic category mentioned in the text, if any.
pub fn find_category(text: &str) -> Option<&'static str> {
    find_in(GENERIC_CATEGORIES, text)
}

/// First city or region mentioned in the text, if any.
pub fn find_city(text: &str) -> Option<&'static str> {
    find_in(CITIES, text.trim())
}

/// True when the text carries a model-tier qualifier.
pub fn has_model_qualifier(text: &str) -> bool {
    find_in(MODEL_QUALIFIERS, text).is_some()
}

/// True when the text contains any ASCII digit.
pub fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// True when the text contains a greeting.
pub fn is_greeting(text: &str) -> bool {
    find_in(GREETINGS, text.trim()).is_some()
}

/// True when the text touches a refused topic.
pub fn mentions_disallowed_topic(text: &str) -> bool {
    find_in(OFF_TOPIC, text.trim()).is_some()
}

/// True when the text talks about price or budget.
pub fn mentions_price(text: &str) -> bool {
    find_in(PRICE_WORDS, text.trim()).is_some()
}
