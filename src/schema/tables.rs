//! Built-in demo catalog: a small Northwind-style database plus a
//! Colombian third-party registry used to exercise NIT handling.

use super::types::*;

// =============================================================================
// Lookup tables (referenced by foreign keys)
// =============================================================================

pub static CUSTOMERS: TableSchema = TableSchema {
    name: "Customers",
    description: "Customer information table",
    size_kb: 256,
    record_count: 1053,
    columns: &[
        ColumnDef::key("CustomerID", "int"),
        ColumnDef::required("CompanyName", "varchar(100)"),
        ColumnDef::new("ContactName", "varchar(100)"),
        ColumnDef::new("ContactTitle", "varchar(50)"),
        ColumnDef::new("Address", "varchar(255)"),
        ColumnDef::new("City", "varchar(50)"),
        ColumnDef::new("Region", "varchar(50)"),
        ColumnDef::new("PostalCode", "varchar(20)"),
        ColumnDef::new("Country", "varchar(50)"),
        ColumnDef::new("Phone", "varchar(20)"),
        ColumnDef::new("Fax", "varchar(20)"),
        ColumnDef::required("IsActive", "bit"),
    ],
    rows: &[
        LookupRow(&[("id", "1"), ("name", "Acme Inc."), ("code", "ACME"), ("country", "USA")]),
        LookupRow(&[("id", "2"), ("name", "Globex Corporation"), ("code", "GLOB"), ("country", "USA")]),
        LookupRow(&[("id", "3"), ("name", "Soylent Corp"), ("code", "SOYL"), ("country", "Canada")]),
    ],
};

pub static EMPLOYEES: TableSchema = TableSchema {
    name: "Employees",
    description: "Employee information",
    size_kb: 96,
    record_count: 87,
    columns: &[
        ColumnDef::key("EmployeeID", "int"),
        ColumnDef::required("LastName", "varchar(50)"),
        ColumnDef::required("FirstName", "varchar(50)"),
        ColumnDef::new("Title", "varchar(50)"),
        ColumnDef::new("BirthDate", "date"),
        ColumnDef::new("HireDate", "date"),
        ColumnDef::new("Notes", "text"),
        ColumnDef::new("ReportsTo", "int").references("Employees"),
    ],
    rows: &[
        LookupRow(&[("id", "1"), ("name", "John Doe"), ("title", "Sales Manager"), ("department", "Sales")]),
        LookupRow(&[("id", "2"), ("name", "Jane Smith"), ("title", "Developer"), ("department", "IT")]),
        LookupRow(&[("id", "3"), ("name", "Bob Johnson"), ("title", "CEO"), ("department", "Executive")]),
    ],
};

pub static SUPPLIERS: TableSchema = TableSchema {
    name: "Suppliers",
    description: "Supplier contacts and details",
    size_kb: 120,
    record_count: 45,
    columns: &[
        ColumnDef::key("SupplierID", "int"),
        ColumnDef::required("CompanyName", "varchar(100)"),
        ColumnDef::new("ContactName", "varchar(100)"),
        ColumnDef::new("Country", "varchar(50)"),
        ColumnDef::new("HomePage", "varchar(500)"),
    ],
    rows: &[
        LookupRow(&[("id", "1"), ("name", "Supplier A"), ("contactName", "Contact A"), ("country", "USA")]),
        LookupRow(&[("id", "2"), ("name", "Supplier B"), ("contactName", "Contact B"), ("country", "Mexico")]),
        LookupRow(&[("id", "3"), ("name", "Supplier C"), ("contactName", "Contact C"), ("country", "Canada")]),
    ],
};

pub static CATEGORIES: TableSchema = TableSchema {
    name: "Categories",
    description: "Product categories",
    size_kb: 32,
    record_count: 18,
    columns: &[
        ColumnDef::key("CategoryID", "int"),
        ColumnDef::required("CategoryName", "varchar(50)"),
        ColumnDef::new("Description", "text"),
    ],
    rows: &[
        LookupRow(&[("id", "1"), ("name", "Beverages"), ("description", "Soft drinks, coffees, teas, beers, and ales")]),
        LookupRow(&[("id", "2"), ("name", "Condiments"), ("description", "Sweet and savory sauces, relishes, spreads, and seasonings")]),
        LookupRow(&[("id", "3"), ("name", "Confections"), ("description", "Desserts, candies, and sweet breads")]),
    ],
};

pub static SHIPPERS: TableSchema = TableSchema {
    name: "Shippers",
    description: "Carriers used for shipments",
    size_kb: 16,
    record_count: 3,
    columns: &[
        ColumnDef::key("ShipperID", "int"),
        ColumnDef::required("CompanyName", "varchar(40)"),
        ColumnDef::new("Phone", "varchar(24)"),
    ],
    rows: &[
        LookupRow(&[("id", "1"), ("name", "Speedy Express")]),
        LookupRow(&[("id", "2"), ("name", "United Package")]),
        LookupRow(&[("id", "3"), ("name", "Federal Shipping")]),
    ],
};

// =============================================================================
// Transactional tables
// =============================================================================

pub static ORDERS: TableSchema = TableSchema {
    name: "Orders",
    description: "Order records",
    size_kb: 512,
    record_count: 5127,
    columns: &[
        ColumnDef::key("OrderID", "int"),
        ColumnDef::required("CustomerID", "int").references("Customers"),
        ColumnDef::required("EmployeeID", "int").references("Employees"),
        ColumnDef::required("OrderDate", "datetime"),
        ColumnDef::new("RequiredDate", "datetime"),
        ColumnDef::new("ShippedDate", "datetime"),
        ColumnDef::new("ShipVia", "int").references("Shippers"),
        ColumnDef::new("Freight", "decimal(10,2)"),
        ColumnDef::new("ShipName", "varchar(100)"),
        ColumnDef::new("ShipAddress", "varchar(255)"),
        ColumnDef::new("ShipCity", "varchar(50)"),
        ColumnDef::new("ShipRegion", "varchar(50)"),
        ColumnDef::new("ShipPostalCode", "varchar(20)"),
        ColumnDef::new("ShipCountry", "varchar(50)"),
        ColumnDef::required("Status", "varchar(20)"),
    ],
    rows: &[],
};

pub static PRODUCTS: TableSchema = TableSchema {
    name: "Products",
    description: "Product catalog",
    size_kb: 128,
    record_count: 412,
    columns: &[
        ColumnDef::key("ProductID", "int"),
        ColumnDef::required("ProductName", "varchar(100)"),
        ColumnDef::new("SupplierID", "int").references("Suppliers"),
        ColumnDef::new("CategoryID", "int").references("Categories"),
        ColumnDef::new("QuantityPerUnit", "varchar(50)"),
        ColumnDef::new("UnitPrice", "decimal(10,2)"),
        ColumnDef::new("UnitsInStock", "int"),
        ColumnDef::new("UnitsOnOrder", "int"),
        ColumnDef::new("ReorderLevel", "int"),
        ColumnDef::required("Discontinued", "bit"),
    ],
    rows: &[],
};

pub static PAYMENTS: TableSchema = TableSchema {
    name: "Payments",
    description: "Payment transactions",
    size_kb: 256,
    record_count: 4891,
    columns: &[
        ColumnDef::key("PaymentID", "int"),
        ColumnDef::required("OrderID", "int").references("Orders"),
        ColumnDef::required("PaymentDate", "datetime"),
        ColumnDef::required("Amount", "decimal(12,2)"),
        ColumnDef::new("Method", "varchar(30)"),
        ColumnDef::required("Confirmed", "bit"),
    ],
    rows: &[],
};

pub static SHIPMENTS: TableSchema = TableSchema {
    name: "Shipments",
    description: "Shipment tracking info",
    size_kb: 320,
    record_count: 4213,
    columns: &[
        ColumnDef::key("ShipmentID", "int"),
        ColumnDef::required("OrderID", "int").references("Orders"),
        ColumnDef::new("ShipperID", "int").references("Shippers"),
        ColumnDef::new("TrackingNumber", "varchar(60)"),
        ColumnDef::new("DispatchedAt", "datetime"),
        ColumnDef::new("DeliveredAt", "datetime"),
        ColumnDef::new("DeliveryNotes", "varchar(1000)"),
    ],
    rows: &[],
};

pub static TIPOS_DOCUMENTO: TableSchema = TableSchema {
    name: "TiposDocumento",
    description: "Tipos de documento de identificación DIAN",
    size_kb: 8,
    record_count: 4,
    columns: &[
        ColumnDef::key("Codigo", "varchar(2)"),
        ColumnDef::required("Nombre", "varchar(60)"),
    ],
    rows: &[
        LookupRow(&[("id", "13"), ("name", "Cédula de ciudadanía")]),
        LookupRow(&[("id", "22"), ("name", "Cédula de extranjería")]),
        LookupRow(&[("id", "31"), ("name", "NIT")]),
        LookupRow(&[("id", "41"), ("name", "Pasaporte")]),
    ],
};

pub static TERCEROS: TableSchema = TableSchema {
    name: "Terceros",
    description: "Registro de terceros (clientes y proveedores)",
    size_kb: 64,
    record_count: 312,
    columns: &[
        ColumnDef::key("TerceroID", "int"),
        ColumnDef::required("TipoDocumento", "varchar(2)").references("TiposDocumento"),
        ColumnDef::required("Nit", "varchar(15)"),
        ColumnDef::required("RazonSocial", "varchar(200)"),
        ColumnDef::new("Direccion", "varchar(255)"),
        ColumnDef::new("Telefono", "varchar(20)"),
        ColumnDef::new("FechaRegistro", "date"),
        ColumnDef::required("Activo", "bit"),
    ],
    rows: &[],
};

// =============================================================================
// Registry
// =============================================================================

/// All catalog tables in listing order
pub static ALL_TABLES: &[&TableSchema] = &[
    &CUSTOMERS,
    &ORDERS,
    &PRODUCTS,
    &EMPLOYEES,
    &SUPPLIERS,
    &CATEGORIES,
    &PAYMENTS,
    &SHIPMENTS,
    &SHIPPERS,
    &TIPOS_DOCUMENTO,
    &TERCEROS,
];

/// Get a table schema by name (case-insensitive)
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_unique() {
        let mut names = table_names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_foreign_keys_point_at_known_tables() {
        for table in ALL_TABLES {
            for dep in table.dependencies() {
                assert!(
                    get_table(dep).is_some(),
                    "{} references unknown table {}",
                    table.name,
                    dep
                );
            }
        }
    }

    #[test]
    fn test_get_table_ignores_case() {
        assert_eq!(get_table("orders").map(|t| t.name), Some("Orders"));
        assert!(get_table("Invoices").is_none());
    }

    #[test]
    fn test_every_table_has_one_primary_key() {
        for table in ALL_TABLES {
            let keys = table.columns.iter().filter(|c| c.primary_key).count();
            assert_eq!(keys, 1, "{} should have exactly one key", table.name);
        }
    }
}
