use crate::schema::ColumnMetadata;

/// Returned instead of a procedure when the table has no primary key
pub const MISSING_PRIMARY_KEY: &str = "-- Error: No primary key found in table";

/// Generate a T-SQL stored procedure handling CREATE/READ/UPDATE/DELETE
pub fn generate_crud_procedure(table_name: &str, columns: &[ColumnMetadata]) -> String {
    let Some(primary_key) = columns.iter().find(|c| c.is_primary_key) else {
        return MISSING_PRIMARY_KEY.to_string();
    };
    let pk = &primary_key.name;

    let params = columns
        .iter()
        .map(|col| {
            let default = if col.nullable { " = NULL" } else { "" };
            format!("@{} {}{}", col.name, col.data_type, default)
        })
        .collect::<Vec<_>>()
        .join(",\n    ");

    let column_list = columns
        .iter()
        .map(|col| col.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let insert_values = columns
        .iter()
        .map(|col| format!("@{}", col.name))
        .collect::<Vec<_>>()
        .join(", ");

    let set_clause = columns
        .iter()
        .filter(|col| !col.is_primary_key)
        .map(|col| format!("{} = @{}", col.name, col.name))
        .collect::<Vec<_>>()
        .join(",\n        ");

    let mut sql = format!(
        "CREATE OR ALTER PROCEDURE [dbo].[sp_{table}_CRUD]\n    @Action NVARCHAR(10),\n    {params}\nAS\nBEGIN\n    SET NOCOUNT ON;\n",
        table = table_name,
    );

    sql.push_str(&format!(
        "
    IF @Action = 'CREATE'
    BEGIN
        INSERT INTO [{table}] ({column_list})
        VALUES ({insert_values});

        SELECT {column_list}
        FROM [{table}]
        WHERE {pk} = SCOPE_IDENTITY();
    END
",
        table = table_name,
    ));

    sql.push_str(&format!(
        "
    ELSE IF @Action = 'READ'
    BEGIN
        IF @{pk} IS NOT NULL
        BEGIN
            SELECT {column_list}
            FROM [{table}]
            WHERE {pk} = @{pk};
        END
        ELSE
        BEGIN
            SELECT {column_list}
            FROM [{table}];
        END
    END
",
        table = table_name,
    ));

    // A table made only of its key has nothing to update
    if !set_clause.is_empty() {
        sql.push_str(&format!(
            "
    ELSE IF @Action = 'UPDATE'
    BEGIN
        UPDATE [{table}]
        SET {set_clause}
        WHERE {pk} = @{pk};

        SELECT {column_list}
        FROM [{table}]
        WHERE {pk} = @{pk};
    END
",
            table = table_name,
        ));
    }

    sql.push_str(&format!(
        "
    ELSE IF @Action = 'DELETE'
    BEGIN
        DELETE FROM [{table}]
        WHERE {pk} = @{pk};

        SELECT 'Record deleted successfully' AS Result;
    END

    ELSE
    BEGIN
        RAISERROR('Invalid action specified. Use CREATE, READ, UPDATE, or DELETE.', 16, 1);
    END
END",
        table = table_name,
    ));

    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{CATEGORIES, SHIPPERS};

    #[test]
    fn test_generate_crud_procedure() {
        let sql = generate_crud_procedure("Categories", &CATEGORIES.column_metadata());

        assert!(sql.starts_with("CREATE OR ALTER PROCEDURE [dbo].[sp_Categories_CRUD]"));
        assert!(sql.contains("@CategoryID int,\n"));
        assert!(sql.contains("@Description text = NULL"));
        assert!(sql.contains("INSERT INTO [Categories] (CategoryID, CategoryName, Description)"));
        assert!(sql.contains("VALUES (@CategoryID, @CategoryName, @Description);"));
        assert!(sql.contains("SET CategoryName = @CategoryName,\n        Description = @Description"));
        assert!(sql.contains("WHERE CategoryID = @CategoryID;"));
        assert!(sql.ends_with("END"));
    }

    #[test]
    fn test_primary_key_not_updated() {
        let sql = generate_crud_procedure("Shippers", &SHIPPERS.column_metadata());
        assert!(!sql.contains("ShipperID = @ShipperID,"));
    }

    #[test]
    fn test_missing_primary_key() {
        let columns: Vec<_> = CATEGORIES
            .column_metadata()
            .into_iter()
            .filter(|c| !c.is_primary_key)
            .collect();
        assert_eq!(generate_crud_procedure("Categories", &columns), MISSING_PRIMARY_KEY);
    }
}
