//! React form component generation

use crate::form::{FieldType, FormConfig, FormField};

const IMPORTS: &str = r#"import React, { useState, useEffect } from 'react';
import { useParams } from 'react-router-dom';
import { useForm } from 'react-hook-form';
import { zodResolver } from '@hookform/resolvers/zod';
import * as z from 'zod';
import { toast } from 'sonner';
import {
  Form,
  FormControl,
  FormField,
  FormItem,
  FormLabel,
  FormMessage
} from '@/components/ui/form';
import { Input } from '@/components/ui/input';
import { Textarea } from '@/components/ui/textarea';
import { Button } from '@/components/ui/button';
import { Select, SelectContent, SelectItem, SelectTrigger, SelectValue } from '@/components/ui/select';
import { Switch } from '@/components/ui/switch';"#;

/// Generate the source of a React component rendering `config`
pub fn generate_form_component(config: &FormConfig) -> String {
    let fields = config.fields();
    let api_path = format!("/api/{}", config.table_name().to_lowercase());
    let select_fields: Vec<&FormField> = fields
        .iter()
        .filter(|f| f.is_foreign_key && f.field_type == FieldType::Select)
        .collect();

    let schema = fields
        .iter()
        .map(zod_entry)
        .collect::<Vec<_>>()
        .join(",\n    ");

    let option_state = select_fields
        .iter()
        .map(|f| {
            format!(
                "const [{}Options, set{}Options] = useState([]);",
                f.name,
                capitalize(&f.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ");

    let option_loaders = select_fields
        .iter()
        .map(|f| option_loader(f))
        .collect::<Vec<_>>()
        .join("\n\n  ");

    let controls = fields
        .iter()
        .map(field_control)
        .collect::<Vec<_>>()
        .join("\n\n        ");

    let mut out = String::new();
    out.push_str(IMPORTS);
    out.push_str("\n\n");
    out.push_str(&format!(
        "export const {} = () => {{\n",
        config.component_name()
    ));
    out.push_str("  const { id } = useParams();\n");
    out.push_str("  const [loading, setLoading] = useState(false);\n");
    if !option_state.is_empty() {
        out.push_str(&format!("  {}\n", option_state));
    }
    out.push('\n');
    out.push_str(&format!(
        "  const formSchema = z.object({{\n    {}\n  }});\n\n",
        schema
    ));
    out.push_str(
        "  const form = useForm<z.infer<typeof formSchema>>({\n    resolver: zodResolver(formSchema),\n    defaultValues: {},\n  });\n\n",
    );
    if !option_loaders.is_empty() {
        out.push_str(&format!("  {}\n\n", option_loaders));
    }
    out.push_str(&record_loader(&api_path));
    out.push_str(&submit_handler(&api_path));
    out.push_str(&format!(
        r#"  return (
    <div className="max-w-2xl mx-auto p-6">
      <h1 className="text-2xl font-bold mb-6">{title}</h1>

      <Form {{...form}}>
        <form onSubmit={{form.handleSubmit(onSubmit)}} className="space-y-6">
        {controls}

          <div className="flex justify-end gap-2">
            <Button type="button" variant="outline">
              Cancel
            </Button>
            <Button type="submit" disabled={{loading}}>
              {{loading ? 'Saving...' : id ? 'Update' : 'Create'}}
            </Button>
          </div>
        </form>
      </Form>
    </div>
  );
}};
"#,
        title = config.name(),
        controls = controls,
    ));

    out
}

/// zod validator for one field
fn zod_entry(field: &FormField) -> String {
    let optional = if field.required { "" } else { ".optional()" };

    match field.field_type {
        FieldType::Number => format!("{}: z.number(){}", field.name, optional),
        FieldType::Switch => format!("{}: z.boolean().default(false)", field.name),
        FieldType::Text | FieldType::Textarea | FieldType::Select | FieldType::Date => {
            format!("{}: z.string(){}", field.name, optional)
        }
    }
}

fn field_control(field: &FormField) -> String {
    let label = &field.label;

    let item = match field.field_type {
        FieldType::Text => format!(
            r#"<FormItem>
              <FormLabel>{label}</FormLabel>
              <FormControl>
                <Input placeholder="{label}" {{...field}} />
              </FormControl>
              <FormMessage />
            </FormItem>"#
        ),
        FieldType::Textarea => format!(
            r#"<FormItem>
              <FormLabel>{label}</FormLabel>
              <FormControl>
                <Textarea placeholder="{label}" {{...field}} />
              </FormControl>
              <FormMessage />
            </FormItem>"#
        ),
        FieldType::Number => format!(
            r#"<FormItem>
              <FormLabel>{label}</FormLabel>
              <FormControl>
                <Input type="number" placeholder="{label}" {{...field}} onChange={{e => field.onChange(Number(e.target.value))}} />
              </FormControl>
              <FormMessage />
            </FormItem>"#
        ),
        FieldType::Date => format!(
            r#"<FormItem>
              <FormLabel>{label}</FormLabel>
              <FormControl>
                <Input type="date" {{...field}} />
              </FormControl>
              <FormMessage />
            </FormItem>"#
        ),
        FieldType::Switch => format!(
            r#"<FormItem className="flex flex-row items-center justify-between rounded-lg border p-4">
              <div className="space-y-0.5">
                <FormLabel className="text-base">{label}</FormLabel>
              </div>
              <FormControl>
                <Switch
                  checked={{field.value}}
                  onCheckedChange={{field.onChange}}
                />
              </FormControl>
            </FormItem>"#
        ),
        FieldType::Select => format!(
            r#"<FormItem>
              <FormLabel>{label}</FormLabel>
              <Select onValueChange={{field.onChange}} defaultValue={{field.value}}>
                <FormControl>
                  <SelectTrigger>
                    <SelectValue placeholder="Select {lower}" />
                  </SelectTrigger>
                </FormControl>
                <SelectContent>
                  {{{options}.map((option) => (
                    <SelectItem key={{option.value}} value={{option.value}}>
                      {{option.label}}
                    </SelectItem>
                  ))}}
                </SelectContent>
              </Select>
              <FormMessage />
            </FormItem>"#,
            lower = label.to_lowercase(),
            options = select_options_expr(field),
        ),
    };

    format!(
        r#"<FormField
          control={{form.control}}
          name="{name}"
          render={{({{ field }}) => (
            {item}
          )}}
        />"#,
        name = field.name,
    )
}

/// Options source for a select: loaded state for foreign keys, inline otherwise
fn select_options_expr(field: &FormField) -> String {
    if field.is_foreign_key {
        return format!("{}Options", field.name);
    }

    let entries = field
        .options
        .iter()
        .flatten()
        .map(|o| {
            format!(
                "{{ value: {}, label: {} }}",
                js_string(&o.value),
                js_string(&o.label)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", entries)
}

fn option_loader(field: &FormField) -> String {
    let table = field.referenced_table.as_deref().unwrap_or_default();
    let label_expr = field
        .foreign_key_fields
        .iter()
        .flatten()
        .map(|f| format!("item.{}", f))
        .collect::<Vec<_>>()
        .join(" + \" - \" + ");
    let label_expr = if label_expr.is_empty() {
        "item.id.toString()".to_string()
    } else {
        label_expr
    };

    format!(
        r#"useEffect(() => {{
    const loadOptions = async () => {{
      try {{
        const response = await fetch(`/api/{path}`);
        const data = await response.json();

        set{setter}Options(
          data.map(item => ({{
            value: item.id.toString(),
            label: {label_expr}
          }}))
        );
      }} catch (error) {{
        console.error("Error loading {table} data:", error);
        toast.error("Failed to load {label} options");
      }}
    }};

    loadOptions();
  }}, []);"#,
        path = table.to_lowercase(),
        setter = capitalize(&field.name),
        label = field.label,
    )
}

fn record_loader(api_path: &str) -> String {
    format!(
        r#"  useEffect(() => {{
    if (id) {{
      const loadData = async () => {{
        setLoading(true);
        try {{
          const response = await fetch(`{api_path}/${{id}}`);
          const data = await response.json();
          form.reset(data);
        }} catch (error) {{
          console.error("Error loading record:", error);
          toast.error("Failed to load record");
        }} finally {{
          setLoading(false);
        }}
      }};

      loadData();
    }}
  }}, [id, form]);

"#
    )
}

fn submit_handler(api_path: &str) -> String {
    format!(
        r#"  const onSubmit = async (values: z.infer<typeof formSchema>) => {{
    setLoading(true);
    try {{
      const method = id ? 'PUT' : 'POST';
      const url = id ? `{api_path}/${{id}}` : `{api_path}`;

      const response = await fetch(url, {{
        method,
        headers: {{ 'Content-Type': 'application/json' }},
        body: JSON.stringify(values),
      }});

      if (!response.ok) {{
        throw new Error('Failed to save record');
      }}

      toast.success(`Record ${{id ? 'updated' : 'created'}} successfully`);
    }} catch (error) {{
      console.error("Error saving record:", error);
      toast.error("Failed to save record");
    }} finally {{
      setLoading(false);
    }}
  }};

"#
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Quote a string as a JavaScript literal
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldChanges, FieldOption, FormSession};
    use crate::schema::tables::{PRODUCTS, TERCEROS};

    fn products() -> FormConfig {
        FormSession::for_table("Products", &PRODUCTS.column_metadata())
            .to_snapshot()
            .unwrap()
    }

    #[test]
    fn test_component_name_and_schema() {
        let code = generate_form_component(&products());

        assert!(code.contains("export const ProductsForm = () => {"));
        assert!(code.contains("ProductID: z.number(),"));
        assert!(code.contains("ProductName: z.string(),"));
        assert!(code.contains("UnitPrice: z.string().optional()"));
        assert!(code.contains("Discontinued: z.boolean().default(false)"));
        assert!(code.contains("SupplierID: z.string().optional()"));
    }

    #[test]
    fn test_foreign_key_loaders() {
        let code = generate_form_component(&products());

        assert!(code.contains("const [SupplierIDOptions, setSupplierIDOptions] = useState([]);"));
        assert!(code.contains("fetch(`/api/suppliers`)"));
        assert!(code.contains("label: item.id + \" - \" + item.name"));
        assert!(code.contains("{SupplierIDOptions.map((option) => ("));
        assert!(code.contains("fetch(`/api/products/${id}`)"));
    }

    #[test]
    fn test_controls_per_type() {
        let code = generate_form_component(&products());

        assert!(code.contains(r#"<Input type="number" placeholder="Units In Stock""#));
        assert!(code.contains(r#"<FormLabel className="text-base">Discontinued</FormLabel>"#));
        assert!(code.contains(r#"<SelectValue placeholder="Select category i d" />"#));
        assert_eq!(code.matches("<FormField\n").count(), PRODUCTS.columns.len());
    }

    #[test]
    fn test_inline_select_options() {
        let mut session = FormSession::for_table("Terceros", &TERCEROS.column_metadata());
        let id = session.field_by_name("Activo").unwrap().id.clone();
        session
            .update_field(
                &id,
                FieldChanges {
                    field_type: Some(FieldType::Select),
                    options: Some(vec![FieldOption::new("Sí", "1"), FieldOption::new("No", "0")]),
                    ..Default::default()
                },
            )
            .unwrap();

        let code = generate_form_component(&session.to_snapshot().unwrap());
        assert!(code.contains(r#"{[{ value: "1", label: "Sí" }, { value: "0", label: "No" }].map("#));
        assert!(code.contains("export const TercerosForm"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("shipVia"), "ShipVia");
        assert_eq!(capitalize(""), "");
    }
}
