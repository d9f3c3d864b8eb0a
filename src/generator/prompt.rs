//! Prompt construction for natural-language-to-SQL generation.

/// Build the generation prompt from the rendered schema text and the user's
/// question.
///
/// The rules steer the model toward exactly what the safety gate admits: a
/// single SELECT statement with no write verbs, plain text without markdown,
/// and an explicit LIMIT.
pub fn build_prompt(schema: &str, question: &str, default_limit: u32, max_limit: u32) -> String {
    format!(
        "You are a PostgreSQL expert. Convert the user's natural language question into a valid PostgreSQL SELECT query.\n\
         \n\
         DATABASE SCHEMA:\n\
         {schema}\n\
         \n\
         CRITICAL: Use EXACT column names from the schema above. PostgreSQL uses snake_case (e.g., order_date, user_id, unit_price).\n\
         \n\
         STRICT RULES:\n\
         1. Generate ONLY a SELECT statement (no INSERT, UPDATE, DELETE, DROP, ALTER, TRUNCATE)\n\
         2. Use EXACT column names as shown in schema (snake_case: order_date NOT orderDate)\n\
         3. Use table aliases for clarity (e.g., FROM orders o, FROM users u)\n\
         4. Add appropriate JOINs when querying multiple tables\n\
         5. Add LIMIT clause (default: LIMIT {default_limit}, max: LIMIT {max_limit}) unless user specifies otherwise\n\
         6. Use aggregate functions (SUM, AVG, COUNT, MAX, MIN) when appropriate\n\
         7. For \"top N\" queries, use ORDER BY with LIMIT\n\
         8. For date/time queries, use PostgreSQL date functions (DATE_TRUNC, EXTRACT)\n\
         9. Output ONLY the SQL query, no explanations or markdown\n\
         10. Use meaningful column aliases with AS keyword\n\
         11. Column names are case-sensitive - use lowercase with underscores\n\
         \n\
         CORRECT EXAMPLES:\n\
         Question: \"Top 5 products by revenue\"\n\
         SQL: SELECT p.name, SUM(oi.quantity * oi.unit_price) AS total_revenue FROM products p JOIN order_items oi ON p.id = oi.product_id GROUP BY p.id, p.name ORDER BY total_revenue DESC LIMIT 5;\n\
         \n\
         Question: \"How many orders per user?\"\n\
         SQL: SELECT u.name, COUNT(o.id) AS order_count FROM users u LEFT JOIN orders o ON u.id = o.user_id GROUP BY u.id, u.name ORDER BY order_count DESC LIMIT {default_limit};\n\
         \n\
         Question: \"Orders from last month\"\n\
         SQL: SELECT o.id, o.order_date, o.total, u.name FROM orders o JOIN users u ON o.user_id = u.id WHERE o.order_date >= CURRENT_DATE - INTERVAL '1 month' ORDER BY o.order_date DESC LIMIT {default_limit};\n\
         \n\
         REMEMBER: Always use snake_case column names (order_date, user_id, unit_price, product_id, order_id)\n\
         \n\
         USER QUESTION: \"{question}\"\n\
         \n\
         SQL:"
    )
}
