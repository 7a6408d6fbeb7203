use portfolio_health_core::models::settings::ReportSettings;
use portfolio_health_core::models::table::{
    COL_BUY_PRICE, COL_CURRENT_PRICE, COL_MARKET_CAP, COL_NAME, COL_QUANTITY, COL_SECTOR,
};

/// Column, description, required.
const COLUMN_GUIDE: [(&str, &str, bool); 6] = [
    (COL_NAME, "Name of the stock/security", true),
    (COL_QUANTITY, "Number of shares/units held", true),
    (COL_BUY_PRICE, "Purchase price per unit", true),
    (COL_CURRENT_PRICE, "Current market price per unit", true),
    (COL_SECTOR, "Industry sector", false),
    (COL_MARKET_CAP, "Large, Mid or Small Cap", false),
];

/// The landing page: upload form, report toggles and the file format guide.
pub fn upload_page(settings: &ReportSettings) -> String {
    let rows: String = COLUMN_GUIDE
        .iter()
        .map(|(column, description, required)| {
            let (label, class) = if *required {
                ("Required", "required")
            } else {
                ("Optional", "optional")
            };
            format!(
                r#"<tr><td><strong>{column}</strong></td><td>{description}</td><td class="{class}">{label}</td></tr>"#
            )
        })
        .collect();

    let checked = |on: bool| if on { " checked" } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Portfolio Health Report Generator</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>Portfolio Health Report Generator</h1>
        <p class="subtitle">Upload your portfolio Excel file and generate a professional health report instantly</p>
        <form method="post" action="/analyze" enctype="multipart/form-data" class="card">
            <h3>File Upload</h3>
            <input type="file" name="file" accept=".xlsx,.xls,.xlsm,.ods,.csv" required>
            <h3>Report Options</h3>
            <input type="hidden" name="include_ai" value="false">
            <label><input type="checkbox" name="include_ai" value="true"{ai}> Include AI Analysis</label>
            <input type="hidden" name="generate_charts" value="false">
            <label><input type="checkbox" name="generate_charts" value="true"{charts}> Generate Charts</label>
            <p><button type="submit">Analyze Portfolio</button></p>
        </form>
        <div class="card">
            <h3>File Format Requirements</h3>
            <table>
                <thead><tr><th>Column</th><th>Description</th><th>Required</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    </div>
</body>
</html>"#,
        css = CSS,
        ai = checked(settings.include_ai_analysis),
        charts = checked(settings.generate_charts),
    )
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f8f9fa; color: #2D3748; margin: 0; }
.container { max-width: 800px; margin: 0 auto; padding: 2rem; }
h1 { color: #1E3A8A; text-align: center; }
.subtitle { color: #718096; text-align: center; font-size: 1.1rem; }
.card { background: white; padding: 1.5rem; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.08); margin-top: 1.5rem; }
label { display: block; margin: .4rem 0; }
button { background: #1E3A8A; color: white; border: 0; padding: .75rem 1.5rem; border-radius: 8px; cursor: pointer; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 12px; border: 1px solid #E2E8F0; text-align: left; }
th { background: #F7FAFC; }
.required { color: #10B981; }
.optional { color: #718096; }
"#;
